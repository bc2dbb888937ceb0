//! Types shared between the lab workspace UI and anything that talks to it.

pub mod shared;
