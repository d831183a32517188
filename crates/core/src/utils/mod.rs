pub mod time_utils;

pub use time_utils::{weekday_name, Calendar, Clock, FixedClock, SystemClock, YearMonth};
