mod data;
mod feed;

pub use data::*;
pub use ephemeris::ScriptedEphemeris;
pub use feed::StaticFeed;

use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}
