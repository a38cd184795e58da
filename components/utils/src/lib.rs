pub mod logger;
pub mod runtime;

pub fn num_cpus() -> usize { num_cpus::get() }
