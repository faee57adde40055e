#[path = "geometry/coincidence.rs"]
mod coincidence;
#[path = "geometry/peripherals.rs"]
mod peripherals;
#[path = "geometry/profile_2d.rs"]
mod profile_2d;
