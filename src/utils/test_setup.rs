use dotenvy::dotenv;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        // .env がない環境向けのデフォルト値
        if std::env::var("SERVER_PORT").is_err() {
            std::env::set_var("SERVER_PORT", "8080");
        }
        if std::env::var("CORS_ORIGIN").is_err() {
            std::env::set_var("CORS_ORIGIN", "http://localhost:3000");
        }
    });
}
