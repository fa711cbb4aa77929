pub mod glow_pass;
pub mod lit_pass;
pub mod pass;
