pub mod artist;
pub mod locations;
pub mod schedule;
pub mod search;
pub mod show;
pub mod venue;
