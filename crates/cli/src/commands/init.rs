//! `chirp init` — Write the default config and sample data files.

use std::collections::HashMap;
use std::path::Path;

use chirp_config::ChirpConfig;
use chirp_core::memory::{KnowledgeEntry, MemoryNode};
use chirp_memory::{GraphSnapshot, HistoryLine};

use crate::runtime::DataPaths;

pub async fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = ChirpConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let paths = DataPaths::default_location();

    println!("🐦 Chirp — Setup");
    println!("================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    write_if_absent(&config_path, &ChirpConfig::default_toml(), force, "config.toml")?;
    write_if_absent(
        &paths.graph,
        &serde_json::to_string_pretty(&sample_graph())?,
        force,
        "graph.json",
    )?;
    write_if_absent(
        &paths.knowledge,
        &serde_json::to_string_pretty(&Vec::<KnowledgeEntry>::new())?,
        force,
        "knowledge.json",
    )?;
    write_if_absent(
        &paths.history,
        &serde_json::to_string_pretty(&sample_history())?,
        force,
        "history.json",
    )?;

    println!("\n📝 Next steps:");
    println!("   1. Edit {} to set the nickname and personas", config_path.display());
    println!("   2. Run: chirp respond -m \"你好\"");
    println!("   3. Run: chirp initiative -g demo\n");

    Ok(())
}

fn write_if_absent(
    path: &Path,
    content: &str,
    force: bool,
    label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        println!("⚠️  {label} already exists, keeping it (use --force to overwrite)");
        return Ok(());
    }
    std::fs::write(path, content)?;
    println!("✅ Wrote {label} at: {}", path.display());
    Ok(())
}

fn node(concept: &str, items: &[&str]) -> MemoryNode {
    MemoryNode::new(concept, items.iter().map(|s| s.to_string()).collect())
}

/// A small graph with enough memory-rich concepts for one initiative cycle.
fn sample_graph() -> GraphSnapshot {
    GraphSnapshot {
        nodes: vec![
            node("猫", &["楼下的橘猫又胖了", "猫喜欢钻纸箱", "猫半夜跑酷", "猫不爱洗澡"]),
            node("宠物", &["养宠物要花很多钱", "宠物医院排队好久", "宠物也会生病", "宠物需要陪伴"]),
            node("火锅", &["重庆火锅很辣", "火锅要配香油碟", "毛肚七上八下", "鸳鸯锅是妥协"]),
            node("考试", &["期末周好难熬", "考试前才开始复习", "挂科要重修", "图书馆抢不到座"]),
            node("游戏", &["昨晚打游戏到三点", "新出的游戏很贵", "队友太坑了", "周末一起开黑"]),
            node("天气", &["今天下大雨", "夏天太热了"]),
            node("狗", &["狗很忠诚", "遛狗要牵绳"]),
        ],
        edges: vec![
            ("猫".into(), "宠物".into()),
            ("宠物".into(), "狗".into()),
            ("火锅".into(), "天气".into()),
            ("考试".into(), "游戏".into()),
        ],
    }
}

fn sample_history() -> HashMap<String, Vec<HistoryLine>> {
    let lines = [
        ("阿明", "今晚吃什么"),
        ("小红", "火锅！"),
        ("阿明", "又吃火锅"),
    ];
    HashMap::from([(
        "demo".to_string(),
        lines
            .iter()
            .map(|(sender, text)| HistoryLine {
                sender: sender.to_string(),
                text: text.to_string(),
            })
            .collect(),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_graph_supports_initiative() {
        let rich = sample_graph()
            .nodes
            .iter()
            .filter(|n| n.memory_items.len() > 3)
            .count();
        assert!(rich >= 5);
    }

    #[test]
    fn sample_files_are_valid_json() {
        let graph = serde_json::to_string(&sample_graph()).unwrap();
        let parsed: GraphSnapshot = serde_json::from_str(&graph).unwrap();
        assert_eq!(parsed.edges.len(), 4);

        let history = serde_json::to_string(&sample_history()).unwrap();
        assert!(history.contains("demo"));
    }
}
