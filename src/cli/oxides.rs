use anyhow::Result;

use super::session::Session;

/// Print the active oxide reference table
pub fn run(session: &Session) -> Result<()> {
    println!("Oxide Reference Table");
    println!("=====================");
    println!(
        "{:<8} {:>10} {:>8} {:>8} {:<7} {:>7}",
        "oxide", "molar_mass", "cations", "oxygens", "cation", "charge"
    );
    for oxide in session.table.iter() {
        println!(
            "{:<8} {:>10.4} {:>8} {:>8} {:<7} {:>7}",
            oxide.symbol,
            oxide.molar_mass,
            oxide.cation_count,
            oxide.oxygen_count,
            oxide.cation_label,
            oxide.charge()
        );
    }
    println!();
    println!("{} oxides", session.table.len());
    Ok(())
}
