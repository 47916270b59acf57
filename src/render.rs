//! Plain-text chat messages for each command.

use chrono::{DateTime, Local};

use crate::Labeled;
use crate::catalog::Catalog;
use crate::ledger::UserHistory;
use crate::opener::{DisplayMode, OpenOutcome, OpenReport, PurgeOutcome};
use crate::quality::{Quality, QualityTag};

/// Rare drops listed in a summary message.
const SUMMARY_RARE_LIMIT: usize = 10;
/// Rare drops listed in an inventory message.
const INVENTORY_RARE_LIMIT: usize = 15;
/// Case names per menu block.
const MENU_BLOCK: usize = 15;

pub fn open_message(outcome: &OpenOutcome, nickname: &str) -> String {
    match outcome {
        OpenOutcome::MissingCaseName => "❌ 请输入武器箱名称".to_string(),
        OpenOutcome::UnknownCase(name) => format!("❌ 未找到【{name}】武器箱"),
        OpenOutcome::Opened(report) => match report.mode {
            DisplayMode::Itemized => itemized(report, nickname),
            DisplayMode::Summary => summary(report, nickname),
        },
    }
}

fn header(title: &str, report: &OpenReport, nickname: &str) -> Vec<String> {
    vec![
        format!("⚡ {title}"),
        format!("{nickname} 开启了 {} 个【{}】", report.count(), report.case_name),
    ]
}

fn footer(lines: &mut Vec<String>, report: &OpenReport, image_url: Option<&str>) {
    if let Some(url) = image_url {
        lines.push(format!("🖼️ {url}"));
    }
    lines.push(format!(
        "📦 当前库存：{}件 | 使用 !开箱 inventory 查看库存",
        report.lifetime_total
    ));
}

fn itemized(report: &OpenReport, nickname: &str) -> String {
    let mut lines = header("开箱结果", report, nickname);
    for (i, item) in report.items.iter().enumerate() {
        lines.push(format!("{}. {} {}", i + 1, item.quality.icon(), item.name));
        lines.push(format!("   品质: {}", item.quality));
        lines.push(format!("   磨损: {} ({:.8})", item.wear_level, item.wear_value));
        lines.push(format!("   编号: #{}", item.template_id));
    }
    let image = report.items.first().and_then(|i| i.image_url.as_deref());
    footer(&mut lines, report, image);
    lines.join("\n")
}

fn summary(report: &OpenReport, nickname: &str) -> String {
    let mut lines = header("开箱统计", report, nickname);

    lines.push("📊 物品统计".to_string());
    let count = report.count().max(1) as f64;
    for (tag, n) in report.tally() {
        let percent = n as f64 / count * 100.0;
        lines.push(format!("{} {}: {}件 ({:.1}%)", tag.icon(), tag, n, percent));
    }

    let rares = report.rare_items();
    if !rares.is_empty() {
        lines.push("💎 稀有物品清单".to_string());
        for (i, item) in rares.iter().take(SUMMARY_RARE_LIMIT).enumerate() {
            lines.push(format!(
                "{}. {} {} | {} ({:.8})",
                i + 1,
                item.quality.icon(),
                item.name,
                item.wear_level,
                item.wear_value
            ));
        }
        if rares.len() > SUMMARY_RARE_LIMIT {
            lines.push(format!("...等共 {} 件稀有物品", rares.len()));
        }
    }

    let image = rares.first().and_then(|i| i.image_url.as_deref());
    footer(&mut lines, report, image);
    lines.join("\n")
}

/// `history` is `None` for users who have never opened anything.
pub fn inventory_message(history: Option<&UserHistory>, nickname: &str) -> String {
    let Some(history) = history.filter(|h| h.total > 0) else {
        return "库存为空\n你的库存中还没有任何物品".to_string();
    };

    let mut lines = vec![
        "🧰 武器库存".to_string(),
        format!("{nickname} 的收藏品"),
        format!("📦 总库存: {}件物品", history.total),
    ];

    let lower: Vec<String> = lower_tier_order(history)
        .into_iter()
        .filter_map(|label| {
            let n = history.other_stats.get(&label).copied().unwrap_or(0);
            (n > 0).then(|| format!("{} {label}: {n}件", QualityTag::parse(&label).icon()))
        })
        .collect();
    if !lower.is_empty() {
        lines.push("🔷 普通物品统计".to_string());
        lines.extend(lower);
    }

    if history.rare_total() > 0 {
        lines.push("💎 稀有物品统计".to_string());
        for (quality, n) in [
            (Quality::Covert, history.red_count),
            (Quality::RareSpecial, history.gold_count),
        ] {
            if n > 0 {
                lines.push(format!("{} {}物品: {}件", quality.icon(), quality.label(), n));
            }
        }

        lines.push("🏆 稀有物品详情".to_string());
        let recent = history.recent_rares(INVENTORY_RARE_LIMIT);
        for (i, record) in recent.iter().enumerate() {
            lines.push(format!(
                "{}. {} | 磨损: {:.8}",
                i + 1,
                record.name,
                record.wear_value
            ));
        }
        if (recent.len() as u64) < history.rare_total() {
            lines.push(format!("...等共 {} 件稀有物品", history.rare_total()));
        }
    }

    if let Some(stamp) = history.last_open.and_then(format_local) {
        lines.push(format!("⏰ 最后开箱时间：{stamp}"));
    }
    lines.join("\n")
}

/// Lower-tier labels in rarity order, then any other recorded labels.
fn lower_tier_order(history: &UserHistory) -> Vec<String> {
    let mut labels: Vec<String> = Quality::ALL
        .iter()
        .filter(|q| !q.is_rare())
        .map(|q| q.label().to_string())
        .collect();
    for label in history.other_stats.keys() {
        if !labels.contains(label) {
            labels.push(label.clone());
        }
    }
    labels
}

fn format_local(unix_secs: f64) -> Option<String> {
    let secs = unix_secs.floor();
    let nanos = ((unix_secs - secs) * 1e9) as u32;
    let utc = DateTime::from_timestamp(secs as i64, nanos)?;
    Some(utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
}

pub fn purge_message(outcome: PurgeOutcome) -> String {
    match outcome {
        PurgeOutcome::Purged => "库存已清空\n您的所有物品已被清除".to_string(),
        PurgeOutcome::NothingToPurge => "无库存\n没有找到可清除的库存数据".to_string(),
    }
}

pub fn menu_message(catalog: &Catalog) -> String {
    let mut lines: Vec<String> = [
        "🔫 CS:GO开箱系统",
        "欢迎使用CS:GO武器箱模拟器！以下是可用的命令和武器箱列表",
        "📖 使用方法",
        "单次开箱：!开箱 open [武器箱名称]",
        "批量开箱：!开箱 open [武器箱名称] [次数]",
        "查看库存：!开箱 inventory",
        "清空库存：!开箱 purge",
    ]
    .map(String::from)
    .into();

    let names: Vec<&str> = catalog.names().collect();
    if names.is_empty() {
        lines.push("📦 暂无可用武器箱".to_string());
    }
    for (block, chunk) in names.chunks(MENU_BLOCK).enumerate() {
        let start = block * MENU_BLOCK + 1;
        let end = start + chunk.len() - 1;
        lines.push(format!("📦 武器箱列表 ({start}-{end})"));
        lines.extend(chunk.iter().map(|name| format!("▫ {name}")));
    }
    lines.push("祝您开出稀有物品！".to_string());
    lines.join("\n")
}
