pub mod adafruit;
pub mod coingecko;
pub mod util;
