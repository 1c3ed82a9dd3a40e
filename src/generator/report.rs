use super::Summary;
use crate::utils::url::url_encode;

/// Render the markdown report for a run.
///
/// The report holds no timestamp, so identical runs render identically.
pub fn render_report(summary: &Summary, link_base: &str) -> String {
    let mut md = String::new();
    md.push_str("# 📊 Proxy configs by protocol and country\n\n");
    md.push_str(
        "Country files only contain configs whose name mentions the country \
         (abbreviations are matched on word boundaries). The name comes from the \
         link's `#` fragment, or from the embedded name for VMess/SSR.\n\n",
    );
    md.push_str(&format!(
        "Input lines: {} · retained: {} · undecodable: {} · filtered as junk: {} · duplicates: {}\n\n",
        summary.stats.input,
        summary.stats.retained,
        summary.stats.decode_failed,
        summary.stats.filter_rejected,
        summary.stats.duplicates
    ));

    md.push_str("## 📁 Protocol files\n\n");
    if summary.protocols.is_empty() {
        md.push_str("No protocol configs found.\n");
    } else {
        md.push_str("| Protocol | Count | File |\n");
        md.push_str("|---|---|---|\n");
        for row in &summary.protocols {
            md.push_str(&format!(
                "| {} | {} | [`{}`]({}) |\n",
                row.protocol,
                row.count,
                row.file,
                link(link_base, &row.file)
            ));
        }
    }
    md.push('\n');

    md.push_str("## 🌍 Country files\n\n");
    if summary.countries.is_empty() {
        md.push_str("No country-related configs found.\n");
    } else {
        md.push_str("| Country | Count | File |\n");
        md.push_str("|---|---|---|\n");
        for row in &summary.countries {
            let mut display = match &row.flag {
                Some(flag) => format!("{} {}", flag, row.name),
                None => row.name.clone(),
            };
            if let Some(native) = &row.native_name {
                display.push_str(&format!(" ({})", native));
            }
            md.push_str(&format!(
                "| {} | {} | [`{}`]({}) |\n",
                display,
                row.count,
                row.file,
                link(link_base, &row.file)
            ));
        }
    }
    md.push('\n');

    md
}

fn link(base: &str, file: &str) -> String {
    let file = url_encode(file);
    if base.is_empty() {
        file
    } else if base.ends_with('/') {
        format!("{}{}", base, file)
    } else {
        format!("{}/{}", base, file)
    }
}
