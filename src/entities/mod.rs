pub mod artist;
pub mod genres;
pub mod location;
pub mod show;
pub mod venue;
