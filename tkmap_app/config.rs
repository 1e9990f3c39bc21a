use dotenvy::dotenv;
use std::env;

use tkmap_types::map::Position;

pub const DEFAULT_API_URL: &str = "https://com1.kingdoms.com/api/";

pub struct Config {
    pub api_url: String,
    pub session: String,
    pub request_timeout_secs: u64,
    pub focus: Option<Position>,
    pub focus_radius: f64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let api_url = match env::var("TKMAP_API_URL") {
            Ok(val) => val,
            Err(_) => DEFAULT_API_URL.to_string(),
        };

        let session = match env::var("TKMAP_SESSION") {
            Ok(val) => val,
            Err(_) => panic!("You need to set env TKMAP_SESSION"),
        };

        let request_timeout_secs = match env::var("TKMAP_REQUEST_TIMEOUT") {
            Ok(val) => val.parse::<u64>().unwrap_or(30).max(1),
            Err(_) => 30,
        };

        let focus_x = env::var("TKMAP_FOCUS_X").ok().and_then(|v| v.parse::<i32>().ok());
        let focus_y = env::var("TKMAP_FOCUS_Y").ok().and_then(|v| v.parse::<i32>().ok());
        let focus = match (focus_x, focus_y) {
            (Some(x), Some(y)) => Some(Position::new(x, y)),
            _ => None,
        };

        let focus_radius = match env::var("TKMAP_FOCUS_RADIUS") {
            Ok(val) => val.parse::<f64>().unwrap_or(7.0),
            Err(_) => 7.0,
        };

        Self {
            api_url,
            session,
            request_timeout_secs,
            focus,
            focus_radius,
        }
    }
}
