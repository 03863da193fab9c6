pub mod config;
pub mod doctor;
pub mod simulate;

pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}
