pub mod admin;
pub mod application;
pub mod auth;
pub mod brand;
pub mod campaign;
pub mod experience;
pub mod influencer;
pub mod invitation;
pub mod lookup;
pub mod notification;
pub mod referral;
pub mod upload;
