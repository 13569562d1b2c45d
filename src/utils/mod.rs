pub mod anyhow;
mod auto_counter;
mod multi_values_map;
pub mod time;

pub use {auto_counter::AutoCounter, multi_values_map::MultiValuesMap};
