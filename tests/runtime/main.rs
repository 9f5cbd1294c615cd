#[path = "../helpers/mod.rs"]
mod helpers;

mod quota;
mod scheduled_effect;
