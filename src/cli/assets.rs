use super::ui;
use crate::core::catalog::{Asset, search_assets};

/// Renders the assets matching `query` as a two-column table.
pub fn render(assets: &[Asset]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Name"), ui::header_cell("Id")]);
    for asset in assets {
        table.add_row(vec![asset.name, asset.id]);
    }
    table.to_string()
}

pub fn run(query: &str) -> anyhow::Result<()> {
    let assets = search_assets(query);
    if assets.is_empty() {
        println!("No assets match {query:?}.");
        return Ok(());
    }

    println!("{}", render(&assets));
    println!(
        "{}",
        ui::style_text(
            "Use the id with `cryptex quote` or `cryptex purchase --asset`.",
            ui::StyleType::Subtle
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_matches() {
        let table = render(&search_assets("coin"));
        assert!(table.contains("Bitcoin-Cash"));
        assert!(table.contains("binancecoin"));
        assert!(table.contains("litecoin"));
        assert!(!table.contains("ethereum"));
    }
}
