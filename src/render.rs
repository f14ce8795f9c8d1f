//! HTML rendering of the merged view model. Sections whose view-model field
//! is absent are simply not emitted; the page itself always renders.

use std::cmp::Ordering;

use crate::aggregator::ViewModel;
use crate::format::{
    capitalize, change_direction, format_number, icon_stack, initials, ChangeDirection,
    IconStack,
};
use crate::vendor::zapper::{App, Asset, Product};
use crate::vendor::zerion::{Changes, Position};

const STYLE: &str = "\
body{font-family:sans-serif;max-width:768px;margin:0 auto;padding:1rem}\
table{width:100%;font-size:.875rem;border-collapse:collapse}\
th{text-align:left;text-transform:uppercase;font-size:.75rem}\
td,th{padding:.5rem}\
img.icon{height:36px;width:36px;vertical-align:middle}\
img.badge{height:16px;width:16px;vertical-align:bottom}\
.placeholder{display:inline-block;height:36px;width:36px;border-radius:50%;\
background:#d1d5db;text-align:center;line-height:36px;font-size:.75rem}\
.more{font-size:.75rem;color:#6b7280}\
.up{color:#22c55e}\
.down{color:#ef4444}\
.name{font-weight:bold}\
.sub{color:#6b7280}\
details{background:#f3f4f6;border-radius:.75rem;margin:.75rem 0}\
details pre{overflow:auto;max-height:800px;font-size:.75rem;padding:.5rem}\
details summary{padding:.5rem;font-weight:bold}";

pub fn page(view: &ViewModel) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    out.push_str("<title>Treasury</title>");
    out.push_str(&format!("<style>{STYLE}</style>"));
    out.push_str("</head><body>");
    out.push_str("<h1>Treasury</h1>");
    out.push_str("<p>Built with data from the Zerion and Zapper APIs.</p>");

    out.push_str(&debug_panel(view));

    if let Some(items) = &view.wallet_items {
        out.push_str(&wallet_table("Wallet", items));
    }
    if let Some(items) = &view.uniswap_items {
        out.push_str(&pool_table("Uniswap V3", items));
    }
    if let Some(items) = &view.bancor_items {
        out.push_str(&pool_table("Bancor", items));
    }
    if let Some(app) = &view.balancer {
        out.push_str(&app_section(app));
    }

    out.push_str("</body></html>");
    out
}

/// Collapsible panel with the raw merged view model as formatted JSON.
fn debug_panel(view: &ViewModel) -> String {
    let json = serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string());
    format!(
        "<details><summary>Aggregated JSON</summary><pre>{}</pre></details>",
        escape(&json)
    )
}

fn wallet_table(title: &str, items: &[Position]) -> String {
    let mut out = format!("<h2>{}</h2>", escape(title));
    out.push_str("<table><thead><tr><th>Asset</th><th>Price</th><th>Balance</th><th>Value</th></tr></thead><tbody>");
    for item in items {
        out.push_str(&asset_row(item));
    }
    out.push_str("</tbody></table>");
    out
}

fn pool_table(title: &str, items: &[Position]) -> String {
    let mut out = format!("<h2>{}</h2>", escape(title));
    out.push_str(
        "<table><thead><tr><th>Asset</th><th>Balance</th><th>Value</th></tr></thead><tbody>",
    );
    for item in items {
        out.push_str(&pool_row(item));
    }
    out.push_str("</tbody></table>");
    out
}

/// Wallet row: token identity, unit price, balance, value with 1-day change.
fn asset_row(item: &Position) -> String {
    let attrs = &item.attributes;
    let info = &attrs.fungible_info;
    let chain = &item.relationships.chain.data.id;

    let mut out = String::from("<tr>");
    out.push_str(&format!(
        "<td>{}<div><div class=\"name\">{}</div><div>{}</div></div></td>",
        token_icon(info.icon.as_ref().map(|i| i.url.as_str()), &info.name),
        escape(&info.name),
        escape(&capitalize(chain)),
    ));
    out.push_str(&format!("<td>{}</td>", price_cell(attrs.price)));
    out.push_str(&format!(
        "<td>{} {}</td>",
        format_number(Some(attrs.quantity.float), Some(3)),
        escape(&info.symbol),
    ));
    out.push_str(&format!(
        "<td>{}</td>",
        value_cell(attrs.value, attrs.changes.as_ref())
    ));
    out.push_str("</tr>");
    out
}

/// Protocol-position row: identity plus position type, balance, value.
fn pool_row(item: &Position) -> String {
    let attrs = &item.attributes;
    let info = &attrs.fungible_info;
    let chain = &item.relationships.chain.data.id;

    let mut out = String::from("<tr>");
    out.push_str(&format!(
        "<td>{}<div><div class=\"name\">{}</div><div>{} &middot; {}</div></div></td>",
        token_icon(info.icon.as_ref().map(|i| i.url.as_str()), &info.name),
        escape(&info.name),
        escape(&capitalize(chain)),
        escape(&capitalize(attrs.position_type.as_str())),
    ));
    out.push_str(&format!(
        "<td>{} {}</td>",
        format_number(Some(attrs.quantity.float), Some(3)),
        escape(&info.symbol),
    ));
    out.push_str(&format!(
        "<td>{}</td>",
        value_cell(attrs.value, attrs.changes.as_ref())
    ));
    out.push_str("</tr>");
    out
}

fn price_cell(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("${}", format_number(Some(price), Some(2))),
        None => String::new(),
    }
}

/// Value in whole dollars, with the 1-day change line when available.
/// A change of exactly zero takes the negative style and no `+` sign.
fn value_cell(value: Option<f64>, changes: Option<&Changes>) -> String {
    let mut out = String::new();
    if let Some(value) = value {
        out.push_str(&format!(
            "<div>${}</div>",
            format_number(Some(value), Some(0))
        ));
    }
    if let Some(changes) = changes {
        let percent = format_number(Some(changes.percent_1d), Some(2));
        let absolute = format_number(Some(changes.absolute_1d.abs()), Some(2));
        match change_direction(changes.absolute_1d) {
            ChangeDirection::Positive => out.push_str(&format!(
                "<div class=\"up\">+{percent}% (${absolute})</div>"
            )),
            ChangeDirection::Negative => out.push_str(&format!(
                "<div class=\"down\">{percent}% (${absolute})</div>"
            )),
        }
    }
    out
}

fn token_icon(url: Option<&str>, name: &str) -> String {
    match url {
        Some(url) => format!(
            "<img class=\"icon\" src=\"{}\" alt=\"{}\">",
            escape(url),
            escape(name)
        ),
        None => format!("<span class=\"placeholder\">{}</span>", escape(&initials(name))),
    }
}

/// Aggregated-app section: one sub-table per product, assets sorted by USD
/// value descending. Ties keep their upstream order.
fn app_section(app: &App) -> String {
    let mut out = format!(
        "<h2><img class=\"icon\" src=\"{}\" alt=\"{}\"> {}</h2>",
        escape(&app.app_image),
        escape(&app.app_name),
        escape(&app.app_name),
    );
    out.push_str(&format!(
        "<p class=\"sub\">{} &middot; ${}</p>",
        escape(&capitalize(app.network.as_str())),
        format_number(Some(app.balance_usd), None),
    ));
    for product in &app.products {
        out.push_str(&product_section(app, product));
    }
    out
}

fn product_section(app: &App, product: &Product) -> String {
    let subtotal: f64 = product.assets.iter().map(|asset| asset.balance_usd).sum();
    let mut out = format!(
        "<h3>{} &middot; ${}</h3>",
        escape(&product.label),
        format_number(Some(subtotal), None),
    );
    out.push_str(
        "<table><thead><tr><th>Asset</th><th>Balance</th><th>Value</th></tr></thead><tbody>",
    );

    let mut assets: Vec<&Asset> = product.assets.iter().collect();
    assets.sort_by(|a, b| {
        b.balance_usd
            .partial_cmp(&a.balance_usd)
            .unwrap_or(Ordering::Equal)
    });
    for asset in assets {
        out.push_str(&asset_product_row(app, asset));
    }

    out.push_str("</tbody></table>");
    out
}

fn asset_product_row(app: &App, asset: &Asset) -> String {
    let props = &asset.display_props;

    let mut out = String::from("<tr>");
    out.push_str(&format!(
        "<td>{}<div><div class=\"name\">{}</div>{}</div></td>",
        icons_html(app, &props.images),
        escape(&props.label),
        match &props.secondary_label {
            Some(label) => format!("<div class=\"sub\">{}</div>", escape(label)),
            None => String::new(),
        },
    ));
    out.push_str(&format!(
        "<td>{}{}</td>",
        format_number(asset.balance, Some(3)),
        match &asset.symbol {
            Some(symbol) => format!(" {}", escape(symbol)),
            None => String::new(),
        },
    ));
    out.push_str(&format!(
        "<td>${}</td>",
        format_number(Some(asset.balance_usd), None)
    ));
    out.push_str("</tr>");
    out
}

/// Token icons with the app icon as a small badge; large token counts
/// collapse into a single icon plus a "+N" marker.
fn icons_html(app: &App, images: &[String]) -> String {
    let app_icon = format!(
        "<img class=\"icon\" src=\"{}\" alt=\"{}\">",
        escape(&app.app_image),
        escape(&app.app_name),
    );
    let app_badge = format!(
        "<img class=\"badge\" src=\"{}\" alt=\"{}\">",
        escape(&app.app_image),
        escape(&app.app_name),
    );
    match icon_stack(images) {
        IconStack::AppOnly => app_icon,
        IconStack::Tokens(images) => {
            let mut out = String::new();
            for image in images {
                out.push_str(&format!("<img class=\"icon\" src=\"{}\" alt=\"\">", escape(image)));
            }
            out.push_str(&app_badge);
            out
        }
        IconStack::Overflow { first, more } => format!(
            "<img class=\"icon\" src=\"{}\" alt=\"\">{}<span class=\"more\">+{}</span>",
            escape(first),
            app_badge,
            more,
        ),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
