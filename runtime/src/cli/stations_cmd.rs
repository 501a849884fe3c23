//! `ionian-wx stations` — list the configured stations.

use anyhow::Result;
use ionian_wx::directory::{self, IONIAN_CODES};

/// Print every hardcoded directory, or just the display name for `id`.
/// Unknown ids print unchanged.
pub fn run(id: Option<&str>, json: bool) -> Result<()> {
    if let Some(id) = id {
        let name = directory::display_name(id);
        if json {
            let doc = serde_json::json!({ "id": id, "name": name });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        } else {
            println!("{name}");
        }
        return Ok(());
    }

    let directories = directory::all();

    if json {
        let doc = serde_json::json!({
            "directories": directories,
            "ionian_codes": IONIAN_CODES,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    for dir in &directories {
        println!("{} ({} stations)", dir.source, dir.len());
        for station in dir.iter() {
            println!("  {:<14} {}", station.id, station.name);
        }
        println!();
    }

    println!("ionian ({} codes, names from the feed)", IONIAN_CODES.len());
    for code in IONIAN_CODES {
        println!("  {code}");
    }

    Ok(())
}
