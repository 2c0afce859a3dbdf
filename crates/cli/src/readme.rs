use std::{
    collections::BTreeMap,
    fs,
    path::Path,
    sync::LazyLock,
};

use log::info;
use regex::{NoExpand, Regex};

use crate::chart::ChartKind;

pub const START_MARKER: &str = "<!-- CHARTS_TABLE_START -->";
pub const END_MARKER: &str = "<!-- CHARTS_TABLE_END -->";

const IMAGE_WIDTH: u32 = 200;

static TABLE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?s){}.*{}",
        regex::escape(START_MARKER),
        regex::escape(END_MARKER)
    ))
    .expect("valid pattern")
});

/// Chart files per exercise, keyed by the file stem.
pub type Charts = BTreeMap<String, BTreeMap<ChartKind, String>>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("document has no chart table section (<!-- CHARTS_TABLE_START --> ... <!-- CHARTS_TABLE_END -->)")]
    MissingMarkers,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Replace the chart table section of a Markdown document by a table of all
/// charts found in `output_dir`.
pub fn update(document_path: &Path, output_dir: &Path, weight_unit: &str) -> Result<(), Error> {
    let document = fs::read_to_string(document_path)?;
    let charts = collect_charts(output_dir)?;
    let updated = inject_table(&document, &render_table(&charts, weight_unit))?;

    fs::write(document_path, updated)?;

    info!(
        "updated {} with {} charted exercises",
        document_path.display(),
        charts.len()
    );

    Ok(())
}

/// Find all SVG files in the chart directories. Missing directories are
/// skipped.
pub fn collect_charts(output_dir: &Path) -> Result<Charts, Error> {
    let mut charts = Charts::new();

    for kind in ChartKind::ALL {
        let dir = output_dir.join(kind.dir_name());
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir)? {
            let file_name = entry?.file_name().to_string_lossy().into_owned();
            let Some(stem) = file_name.strip_suffix(".svg") else {
                continue;
            };
            charts.entry(crate::report::safe_filename(stem)).or_default().insert(
                kind,
                format!(
                    "{}/{}/{file_name}",
                    output_dir.display(),
                    kind.dir_name()
                ),
            );
        }
    }

    Ok(charts)
}

#[must_use]
pub fn render_table(charts: &Charts, weight_unit: &str) -> String {
    let rows = charts
        .iter()
        .map(|(name, files)| {
            let cell = |kind: ChartKind| {
                files
                    .get(&kind)
                    .map(|path| img_tag(path))
                    .unwrap_or_default()
            };
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                display_name(name),
                cell(ChartKind::Volume),
                cell(ChartKind::Reps),
                cell(ChartKind::WeightStats),
            )
        })
        .collect::<Vec<_>>();

    format!(
        "<table>\n\
         <tr><th>Exercise</th><th>Volume (total {weight_unit})</th><th>Reps</th><th>Weight Stats ({weight_unit})</th></tr>\n\
         {}\n\
         </table>",
        rows.join("\n")
    )
}

pub fn inject_table(document: &str, table: &str) -> Result<String, Error> {
    if !TABLE_SECTION.is_match(document) {
        return Err(Error::MissingMarkers);
    }

    Ok(TABLE_SECTION
        .replace(
            document,
            NoExpand(&format!("{START_MARKER}\n{table}\n{END_MARKER}")),
        )
        .into_owned())
}

fn img_tag(path: &str) -> String {
    format!(r#"<img src="{path}" width="{IMAGE_WIDTH}"/>"#)
}

/// Turn a file stem back into a readable title, e.g. `bench_press` into
/// `Bench Press`.
fn display_name(stem: &str) -> String {
    stem.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
