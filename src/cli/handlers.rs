use std::path::Path;

use crate::config::{ServerConfig, StoreConfig};
use crate::entity::TenantId;
use crate::error::Result;
use crate::storage::JsonStore;

fn open_store(data_dir: &Path) -> Result<JsonStore> {
    JsonStore::open(&StoreConfig::new(data_dir))
}

pub fn handle_serve(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(crate::http::serve(&config))
}

pub fn handle_show(data_dir: &Path, tenant: &str) -> Result<()> {
    let tenant = TenantId::parse(tenant)?;
    let store = open_store(data_dir)?;

    let doc = store.read(&tenant);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

pub fn handle_categories(data_dir: &Path, tenant: &str, json: bool) -> Result<()> {
    let tenant = TenantId::parse(tenant)?;
    let store = open_store(data_dir)?;

    let categories = store.list_categories(&tenant);
    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("No categories for {}", tenant);
    }
    for name in categories.iter().filter_map(|c| c.name()) {
        println!("{}", name);
    }
    Ok(())
}

pub fn handle_tasks(data_dir: &Path, tenant: &str, category: Option<String>) -> Result<()> {
    let tenant = TenantId::parse(tenant)?;
    let store = open_store(data_dir)?;

    let tasks = match category {
        Some(name) => store.tasks_by_category(&tenant, &name),
        None => store.read(&tenant).tasks.unwrap_or_default(),
    };
    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(())
}

pub fn handle_merge(data_dir: &Path, source: &str, destination: &str) -> Result<()> {
    let source = TenantId::parse(source)?;
    let destination = TenantId::parse(destination)?;
    let store = open_store(data_dir)?;

    let report = store.merge_and_delete(&source, &destination)?;
    println!("{}", report.message());
    println!(
        "  {} tasks ({} replaced), {} categories added",
        report.task_count, report.tasks_replaced, report.categories_added
    );
    Ok(())
}
