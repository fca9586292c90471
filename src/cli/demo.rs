use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use cytocat::fcs::FcsWriter;

/// Panel written into every demo file: (name, label). Scatter and time
/// channels are there to show the fluorescence filter at work.
const PANEL: [(&str, &str); 7] = [
    ("FSC-A", ""),
    ("SSC-A", ""),
    ("FL1-A", "CD3-FITC"),
    ("FL2-A", "CD4-PE"),
    ("FL3-A", "CD8-PerCP"),
    ("FL4-A", "CD19-APC"),
    ("Time", ""),
];

/// Generate a small `grupo_<letter>/<assay>/` tree of synthetic FCS files
pub fn run(output: &Path) -> Result<()> {
    let date = chrono::Local::now().format("%d-%b-%Y").to_string().to_uppercase();
    info!("Writing demo files into {}", output.display());

    let samples = [
        ("grupo_a", "imunofenotipagem", 11, 1_500),
        ("grupo_a", "imunofenotipagem", 12, 2_500),
        ("grupo_a", "fagocitose", 13, 800),
        ("grupo_b", "imunofenotipagem", 21, 3_000),
        ("grupo_b", "agonistas", 22, 1_200),
    ];

    for (group, assay, animal, events) in samples {
        let dir = output.join(group).join(assay);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        let path = dir.join(format!("R{}_{}.fcs", animal, assay));

        let mut writer = FcsWriter::new()
            .keyword("$DATE", date.as_str())
            .keyword("$CYT", "FACSCanto II")
            .keyword("TBNM", format!("Animal {}", animal))
            .keyword("$SRC", format!("{} {}", group, assay));
        for (name, label) in PANEL {
            writer = writer.parameter(name, label);
        }
        let writer = writer.events(mock_events(animal as u64, events));

        writer
            .write_file(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("  {} ({} events)", path.display(), events);
    }

    // One unreadable file so the failure path can be tried too
    let broken = output.join("grupo_b").join("agonistas").join("R23_truncated.fcs");
    std::fs::write(&broken, b"FCS3.1    ")
        .with_context(|| format!("Failed to write {}", broken.display()))?;

    println!("Demo files written to {}", output.display());
    println!("Set catalog.data_root = \"{}\" to scan them.", output.display());
    Ok(())
}

/// Deterministic pseudo-random events (xorshift), one value per panel channel
fn mock_events(seed: u64, count: usize) -> Vec<Vec<f32>> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1u64 << 24) as f32
    };

    (0..count)
        .map(|i| {
            let mut event: Vec<f32> = PANEL.iter().map(|_| next() * 262_144.0).collect();
            if let Some(time) = event.last_mut() {
                *time = i as f32 * 0.01;
            }
            event
        })
        .collect()
}
