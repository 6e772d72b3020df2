use std::env;

#[derive(Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub listen_addr: String,
    pub frontend_url: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let frontend_url = env::var("FRONTEND_URL").ok();

        Ok(ServerConfig {
            database_url,
            listen_addr,
            frontend_url,
        })
    }
}
