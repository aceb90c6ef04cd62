/// Message rendering for Telegram (HTML parse mode)
use crate::classifier::Category;
use crate::constants::{CHAIN_NAME, CHART_URL, LAMPORTS_PER_SOL, SOLSCAN_ACCOUNT_URL, SOLSCAN_TX_URL};
use crate::tracker::TrackedWallet;
use crate::transactions::TransactionDetail;
use num_format::{Locale, ToFormattedString};

/// Escape text for Telegram HTML
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn lamports_to_sol(lamports: u128) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// `1234.5` -> `$1,234.50`
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

fn amount_line(category: Category, delta: i128, usd_price: Option<f64>) -> Option<String> {
    if delta == 0 {
        return None;
    }

    let sol = lamports_to_sol(delta.unsigned_abs());
    let usd = usd_price
        .map(|price| format!(" ({})", format_usd(sol * price)))
        .unwrap_or_default();

    let is_swap = matches!(category, Category::Swap | Category::SwapBuy | Category::SwapSell);
    let line = match (is_swap, delta > 0) {
        (true, false) => format!("Swapped {:.4} #SOL{}", sol, usd),
        (true, true) => format!("Received {:.4} #SOL{} from swap", sol, usd),
        (false, false) => format!("Sent {:.4} #SOL{}", sol, usd),
        (false, true) => format!("Received {:.4} #SOL{}", sol, usd),
    };
    Some(line)
}

/// Notification for one classified transaction of a tracked wallet
pub fn render_activity(
    wallet_name: &str,
    category: Category,
    detail: &TransactionDetail,
    usd_price: Option<f64>,
) -> String {
    let mut lines = vec![
        format!("<b>#{}</b>", html_escape(&wallet_name.to_uppercase())),
        format!("Type: <b>{}</b>", category.label()),
    ];

    if detail.failed {
        lines.push("❌ Transaction failed".to_string());
    }

    if let Some(line) = detail
        .native_delta()
        .and_then(|delta| amount_line(category, delta, usd_price))
    {
        lines.push(line);
    }

    let wallet_link = detail
        .primary_account()
        .map(|address| format!(" | <a href=\"{}{}\">Wallet</a>", SOLSCAN_ACCOUNT_URL, html_escape(address)))
        .unwrap_or_default();

    lines.push(format!(
        "#{} | <a href=\"{}{}\">ViewTx</a>{} | <a href=\"{}\">Chart</a>",
        CHAIN_NAME,
        SOLSCAN_TX_URL,
        html_escape(&detail.signature),
        wallet_link,
        CHART_URL
    ));

    lines.join("\n")
}

/// One error notice per failure episode of a channel
pub fn render_channel_error(wallet_name: &str, channel: &str, message: &str) -> String {
    format!(
        "⚠️ Monitoring error for {} ({}): {}",
        html_escape(wallet_name),
        html_escape(channel),
        html_escape(message)
    )
}

pub fn render_wallet_list(wallets: &[TrackedWallet]) -> String {
    if wallets.is_empty() {
        return "No wallets tracked yet.".to_string();
    }

    let mut text = String::from("Tracked wallets:\n\n");
    for wallet in wallets {
        let filter = wallet
            .category_filter
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!(
            "💼 <b>{}</b> ({})\n<code>{}</code>\nTypes: {}\n\n",
            html_escape(&wallet.name),
            CHAIN_NAME,
            html_escape(&wallet.address),
            filter
        ));
    }
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::fixtures::{token_transfer_result, WALLET};

    fn detail_with_delta(pre: u64, post: u64) -> TransactionDetail {
        let mut detail = TransactionDetail::from_rpc_value("sig-1", token_transfer_result()).unwrap();
        detail.pre_balances[0] = pre;
        detail.post_balances[0] = post;
        detail
    }

    #[test]
    fn test_escape() {
        assert_eq!(html_escape("<b>&\"x\""), "&lt;b&gt;&amp;&quot;x&quot;");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(0.004), "$0.00");
        assert_eq!(format_usd(-2.0), "-$2.00");
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn test_swap_wording() {
        let detail = detail_with_delta(3_000_000_000, 1_750_000_000);
        let text = render_activity("whale", Category::Swap, &detail, Some(137.0));

        assert!(text.starts_with("<b>#WHALE</b>"));
        assert!(text.contains("Swapped 1.2500 #SOL ($171.25)"));
        assert!(text.contains("https://solscan.io/tx/sig-1"));
        assert!(text.contains(&format!("https://solscan.io/account/{}", WALLET)));

        let detail = detail_with_delta(1_000_000_000, 1_500_000_000);
        let text = render_activity("whale", Category::Swap, &detail, None);
        assert!(text.contains("Received 0.5000 #SOL from swap"));
        assert!(!text.contains('$'));
    }

    #[test]
    fn test_plain_and_zero_delta() {
        let detail = detail_with_delta(1_000_000_000, 0);
        let text = render_activity("w1", Category::Send, &detail, None);
        assert!(text.contains("Type: <b>Send</b>"));
        assert!(text.contains("Sent 1.0000 #SOL"));

        let detail = detail_with_delta(10, 10);
        let text = render_activity("w1", Category::Transfer, &detail, Some(137.0));
        assert!(!text.contains("#SOL"));
        assert!(text.contains("#Solana"));
    }

    #[test]
    fn test_channel_error_text() {
        assert_eq!(
            render_channel_error("w<1>", "account", "connection reset"),
            "⚠️ Monitoring error for w&lt;1&gt; (account): connection reset"
        );
    }
}
