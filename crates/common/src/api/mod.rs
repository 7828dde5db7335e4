pub mod open_ai;
