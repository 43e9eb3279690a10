use std::fs;
use std::path::Path;

use super::error::CatalogError;
use super::types::{ElementSet, Provenance, Satellite};

/// Load every TLE file in `dir` (and its `simulated/` subdirectory, whose
/// element sets are tagged accordingly). An unreadable file or a malformed
/// element set is reported and skipped; the rest of the catalog still loads.
pub fn load_dir(dir: &Path) -> Result<Vec<Satellite>, CatalogError> {
    if !dir.exists() {
        return Err(CatalogError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut satellites = Vec::new();
    load_flat(dir, Provenance::Live, &mut satellites)?;

    let simulated = dir.join("simulated");
    if simulated.is_dir() {
        load_flat(&simulated, Provenance::Simulated, &mut satellites)?;
    }

    satellites.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(satellites)
}

fn load_flat(
    dir: &Path,
    provenance: Provenance,
    satellites: &mut Vec<Satellite>,
) -> Result<(), CatalogError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension() else {
            continue;
        };
        if ext != "tle" && ext != "txt" {
            continue;
        }

        match parse_tle_file(&path, provenance) {
            Ok(parsed) => satellites.extend(parsed),
            Err(e) => {
                log::warn!("failed to parse TLE file {}: {}", path.display(), e);
            }
        }
    }
    Ok(())
}

fn parse_tle_file(path: &Path, provenance: Provenance) -> Result<Vec<Satellite>, CatalogError> {
    let content = fs::read_to_string(path)?;

    let mut satellites = Vec::new();
    for (name, line1, line2) in parse_multi_tle(&content) {
        // A bad element set only loses that satellite, not its siblings in
        // the same file.
        match ElementSet::from_tle(name, &line1, &line2, provenance) {
            Ok(elements) => satellites.push(Satellite::from_elements(elements)),
            Err(e) => log::warn!("skipping element set in {}: {}", path.display(), e),
        }
    }
    Ok(satellites)
}

/// Split TLE file content into element sets. Accepts both the bare 2-line
/// form and the 3-line form with a leading name line; unknown lines are
/// skipped.
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
