pub mod broadcast;
pub mod fcm;
pub mod health;
pub mod multicast;
pub mod response;
pub mod validation;
