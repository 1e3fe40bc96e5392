//! Voices command implementation.

use crate::error::Result;
use crate::output::Formatter;
use fourthwall_domain::VoiceRoster;

/// Execute the voices command.
pub fn execute_voices(roster: &VoiceRoster, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_voices(roster)?);
    Ok(())
}
