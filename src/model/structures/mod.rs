pub mod dimension;
pub mod elo_type;
pub mod plate_appearance;
pub mod player_elo_state;
pub mod player_role;
pub mod result_type;
