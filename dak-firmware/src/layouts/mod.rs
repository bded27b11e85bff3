//! Reference layouts as static data.

pub mod dak10_fi;
