//! Telegram HTML rendering of alerts and their enrichment.

use dumper_core::{
    Chain, DepositAggregateResult, MarketListing, SpreadRow, TokenPairSnapshot,
};
use std::fmt::Write;

/// Below this pool size the alert carries a warning marker.
const THIN_POOL_USD: f64 = 300_000.0;
/// A 5-minute fall steeper than this gets an extra marker.
const HARD_FALL_PCT: f64 = -40.0;
const LISTING_NAME_WIDTH: usize = 8;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `1.2M`, `350k` or plain dollars under a thousand.
pub fn format_liquidity(usd: f64) -> String {
    if usd >= 1_000_000.0 {
        format!("{:.1}M", usd / 1_000_000.0)
    } else if usd >= 1_000.0 {
        format!("{:.0}k", usd / 1_000.0)
    } else {
        format!("{:.0}", usd)
    }
}

/// Enough decimals to show a meaningful price for micro-caps.
pub fn format_price(price: f64) -> String {
    let raw = if price >= 1.0 {
        format!("{:.4}", price)
    } else {
        format!("{:.10}", price)
    };
    let trimmed = raw.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn format_change(change: Option<f64>) -> String {
    match change {
        Some(v) => format!("{:.2}", v),
        None => "?".to_string(),
    }
}

pub fn dextools_url(chain: Chain, pair_address: &str) -> Option<String> {
    chain
        .explorer_key()
        .map(|key| format!("https://www.dextools.io/app/ru/{}/pair-explorer/{}", key, pair_address))
}

pub fn defillama_url(chain: Chain, token: &str) -> Option<String> {
    chain.explorer_key().map(|key| {
        format!(
            "https://swap.defillama.com/?chain={}&from=0x0000000000000000000000000000000000000000&tab=swap&to={}",
            key, token
        )
    })
}

pub fn oneinch_url(chain: Chain, token: &str) -> Option<String> {
    chain
        .oneinch_id()
        .map(|id| format!("https://app.1inch.io/#/{}/simple/swap/USDT/{}/import-token", id, token))
}

fn link(label: &str, url: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape_html(url), label)
}

/// The initial alert text. The contract address always appears verbatim.
pub fn render_alert(snap: &TokenPairSnapshot, listings: &[MarketListing]) -> String {
    let symbol = escape_html(&snap.base_symbol);
    let mut out = String::new();

    let m5 = snap.change_m5.unwrap_or(0.0);
    let _ = write!(
        out,
        "<code>{}</code> / {}% 5m / {}% 1h ⚡️🔻",
        symbol,
        format_change(snap.change_m5),
        format_change(snap.change_h1),
    );
    if m5 < HARD_FALL_PCT {
        out.push('🔥');
    }
    out.push_str("\n\n");

    let _ = writeln!(
        out,
        "Pair: {} on {} ({})",
        escape_html(&snap.pair_label()),
        escape_html(&snap.dex_id),
        escape_html(&snap.chain_id)
    );
    let _ = writeln!(
        out,
        "Fall: {}% 5m, {}% 1h",
        format_change(snap.change_m5),
        format_change(snap.change_h1)
    );
    let _ = writeln!(out, "Cost: ${}", format_price(snap.price_usd));
    let marker = if snap.liquidity_usd < THIN_POOL_USD { "🚨" } else { "🔥" };
    let _ = writeln!(
        out,
        "Pool: {}$ {} / {}$ {} {}",
        format_liquidity(snap.token_liquidity_usd()),
        symbol,
        format_liquidity(snap.native_liquidity_usd()),
        escape_html(&snap.quote_symbol),
        marker
    );

    let chain = snap.chain();
    let swaps: Vec<String> = chain
        .into_iter()
        .flat_map(|c| {
            [
                defillama_url(c, &snap.base_address).map(|u| link("DefiLama", &u)),
                oneinch_url(c, &snap.base_address).map(|u| link("1inch", &u)),
            ]
        })
        .flatten()
        .collect();
    if !swaps.is_empty() {
        let _ = writeln!(out, "Swap: {}", swaps.join(" | "));
    }

    let mut links = Vec::new();
    if !snap.url.is_empty() {
        links.push(link("Screener", &snap.url));
    }
    if let Some(url) = chain.and_then(|c| dextools_url(c, &snap.pair_address)) {
        links.push(link("Tools", &url));
    }
    if let Some(url) = &snap.links.website {
        links.push(link("Website", url));
    }
    if let Some(url) = &snap.links.twitter {
        links.push(link("Twitter", url));
    }
    if let Some(url) = &snap.links.telegram {
        links.push(link("Telegram", url));
    }
    if !links.is_empty() {
        let _ = writeln!(out, "\n{}", links.join(" | "));
    }

    let _ = writeln!(out, "\n<code>{}</code>", escape_html(&snap.base_address));

    if !listings.is_empty() {
        out.push_str("\n<blockquote>");
        let rows: Vec<String> = listings
            .iter()
            .map(|listing| {
                let name: String = listing.market.chars().take(LISTING_NAME_WIDTH).collect();
                let mut row = format!(
                    "{:<width$}{:>7.0}%",
                    escape_html(&name),
                    listing.spread_pct(snap.price_usd),
                    width = LISTING_NAME_WIDTH
                );
                if let Some(url) = &listing.trade_url {
                    row.push(' ');
                    row.push_str(&link("Link", url));
                }
                row
            })
            .collect();
        out.push_str(&rows.join("\n"));
        out.push_str("</blockquote>");
    }

    out.trim_end().to_string()
}

/// Deposit table in canonical venue order.
pub fn render_deposits(deposits: &DepositAggregateResult) -> String {
    let mut out = String::from("<pre>Exchange  Deposit  Conf  Chain\n");
    for (venue, status) in deposits.entries() {
        let mark = if status.enabled { "✅" } else { "❌" };
        let confirmations = status
            .confirmations
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let network = status.network.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<10}{:<9}{:<6}{}",
            venue.as_str(),
            mark,
            confirmations,
            escape_html(network)
        );
    }
    out.push_str("</pre>");
    out
}

/// Per-venue bid tables: price, notional and spread against the DEX price.
pub fn render_spreads(rows: &[SpreadRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = write!(out, "<b>{}</b>\n<pre>", escape_html(row.venue.as_str()));
        for level in &row.levels {
            let _ = writeln!(
                out,
                "{:<13.8}{:<10.2}{:>6.2}%",
                level.price, level.notional, level.spread_pct
            );
        }
        out.push_str("</pre>\n");
    }
    out.trim_end().to_string()
}

/// Original alert text followed by the deposit and spread tables.
pub fn render_update(alert: &str, deposits: &DepositAggregateResult, rows: &[SpreadRow]) -> String {
    let mut out = String::from(alert);
    out.push_str("\n\n");
    out.push_str(&render_deposits(deposits));
    if !rows.is_empty() {
        out.push_str("\n\n");
        out.push_str(&render_spreads(rows));
    }
    out
}
