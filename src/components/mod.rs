pub mod lot_card;
pub mod navbar;
pub mod stat_card;
