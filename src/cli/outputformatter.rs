use crate::identity::{capabilities_for, Capability, SessionAuthority};
use crate::inventory::{Product, Transaction};

const MAX_COL_WIDTH: usize = 40; // cap to keep output readable

/// Render rows under `cols` as an ASCII table with a `rows: N` footer.
/// Numeric-looking cells are right aligned.
pub fn render_table(cols: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = cols.iter().map(|s| display_len(s).min(MAX_COL_WIDTH)).collect();
    for r in rows {
        for (i, cell) in r.iter().enumerate().take(cols.len()) {
            let w = display_len(cell);
            if w > widths[i] { widths[i] = w.min(MAX_COL_WIDTH); }
        }
    }
    let header: Vec<String> = cols.iter().map(|c| c.to_string()).collect();
    let sep = build_separator(&widths);
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&build_row(&header, &widths, false));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for r in rows {
        out.push_str(&build_row(r, &widths, true));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&format!("rows: {}", rows.len()));
    out
}

pub fn money(v: f64) -> String { format!("{:.2}", v) }

fn opt_money(v: Option<f64>) -> String { v.map(money).unwrap_or_else(|| "-".to_string()) }

pub fn products_table(products: &[Product]) -> String {
    let analytics = products.iter().any(|p| p.avg_purchase_price.is_some() || p.avg_selling_price.is_some() || p.profit_loss.is_some());
    let mut cols = vec!["id", "name", "added_qty", "added_amount", "sold_qty", "sold_amount", "stock"];
    if analytics { cols.extend(["avg_purchase", "avg_selling", "profit_loss"]); }
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            let mut r = vec![
                p.id.to_string(),
                p.name.clone(),
                p.total_added_qty.to_string(),
                money(p.total_added_amount),
                p.total_sold_qty.to_string(),
                money(p.total_sold_amount),
                p.available_stock.to_string(),
            ];
            if analytics {
                r.push(opt_money(p.avg_purchase_price));
                r.push(opt_money(p.avg_selling_price));
                r.push(opt_money(p.profit_loss));
            }
            r
        })
        .collect();
    render_table(&cols, &rows)
}

pub fn transactions_table(txs: &[Transaction]) -> String {
    let rows: Vec<Vec<String>> = txs
        .iter()
        .map(|t| vec![
            t.id.to_string(),
            t.date.clone(),
            t.product_name.clone(),
            t.kind.as_str().to_string(),
            t.quantity.to_string(),
            money(t.unit_price),
            money(t.total_amount),
        ])
        .collect();
    render_table(&["id", "date", "product", "type", "qty", "unit_price", "total"], &rows)
}

pub fn capabilities_table(authority: &SessionAuthority) -> String {
    let held = authority.get_user().map(|u| capabilities_for(&u.role)).unwrap_or_default();
    let rows: Vec<Vec<String>> = Capability::ALL
        .iter()
        .map(|c| vec![c.label().to_string(), if held.contains(c) { "yes" } else { "no" }.to_string()])
        .collect();
    render_table(&["capability", "allowed"], &rows)
}

fn display_len(s: &str) -> usize { s.chars().count() }

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize], align_numbers: bool) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let text = truncate(&cell, *w);
        let pad = w.saturating_sub(display_len(&text));
        s.push(' ');
        if align_numbers && is_numeric_like(&cell) {
            s.push_str(&" ".repeat(pad));
            s.push_str(&text);
        } else {
            s.push_str(&text);
            s.push_str(&" ".repeat(pad));
        }
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    let take = max - 1;
    s.chars().take(take).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    // crude detection for aligning numbers to right
    let st = s.trim();
    if st.is_empty() { return false; }
    let mut has_digit = false;
    for ch in st.chars() {
        if ch.is_ascii_digit() { has_digit = true; continue; }
        if ".-+,_".contains(ch) { continue; }
        return false;
    }
    has_digit
}
