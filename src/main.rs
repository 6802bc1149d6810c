//! Schedule I Save Calculator
//!
//! Reads an unpacked Schedule I save and ranks the products it has
//! discovered by production economics.

mod calculator;
mod catalog;
mod chain;
mod dealers;
mod error;
mod extract;
mod metadata;
mod models;
mod npcs;
mod products;
mod properties;
mod save;
#[cfg(test)]
mod test_fixtures;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::warn;

use crate::calculator::{EquipmentOverrides, FamilyProfile, ProductionContext, SortField};
use crate::models::{ChainEnd, Family, Product};
use crate::npcs::OrderAverage;
use crate::products::WhatIfProduct;
use crate::save::ParsedSave;

#[derive(Parser)]
#[command(name = "schedule-calculator")]
#[command(about = "Save analyzer and production economics calculator for Schedule I")]
struct Cli {
    /// Path to an unpacked save folder (e.g. SaveGame_1)
    #[arg(short, long)]
    save: PathBuf,

    /// Customer average order quantity aggregate
    #[arg(long, value_enum, default_value_t = OrderAverage::SumOfProducts)]
    order_average: OrderAverage,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FamilyArg {
    Plant,
    Crystal,
    Powder,
}

impl From<FamilyArg> for Family {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Plant => Family::Plant,
            FamilyArg::Crystal => Family::Crystal,
            FamilyArg::Powder => Family::Powder,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Organisation, player and save-wide counts
    Overview,

    /// List the products of one family with their recipe chains
    Products {
        #[arg(value_enum)]
        family: FamilyArg,

        /// Show the raw save records instead
        #[arg(long)]
        raw: bool,
    },

    /// Rank a family's products by production economics
    Rank {
        #[arg(value_enum)]
        family: FamilyArg,

        /// Property code whose equipment is counted
        #[arg(short, long)]
        property: Option<String>,

        /// Growing pots override
        #[arg(long, value_parser = calculator::lenient_count)]
        pots: Option<u32>,

        /// Mixing stations override
        #[arg(long, value_parser = calculator::lenient_count)]
        mixers: Option<u32>,

        /// Lab ovens override
        #[arg(long, value_parser = calculator::lenient_count)]
        ovens: Option<u32>,

        /// Chemistry stations override
        #[arg(long, value_parser = calculator::lenient_count)]
        stations: Option<u32>,

        /// Cauldrons override
        #[arg(long, value_parser = calculator::lenient_count)]
        cauldrons: Option<u32>,

        /// Customer count override (defaults to active clients in the save)
        #[arg(long)]
        customers: Option<usize>,

        /// Extra daily units on top of customer demand
        #[arg(long, default_value = "0")]
        margin: u32,

        #[arg(long, value_enum, default_value_t = SortField::ProfitPerDay)]
        sort: SortField,

        #[arg(long)]
        ascending: bool,

        /// Show at most this many products
        #[arg(short, long)]
        limit: Option<usize>,

        /// Hypothetical product, repeatable
        #[arg(long = "what-if", value_name = "NAME=BASE+ADDITIVE...@PRICE")]
        what_if: Vec<WhatIfProduct>,
    },

    /// Properties with their workers and equipment
    Properties,

    /// Dealer customer assignments and suggested swaps
    Dealers,

    /// Active clients and their demand
    Customers,

    /// Suppliers and outstanding debt
    Suppliers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let entries = extract::load_save_dir(&cli.save)
        .with_context(|| format!("Failed to read save folder {}", cli.save.display()))?;
    let save = save::parse_save(&entries, cli.order_average)
        .with_context(|| format!("Could not parse save {}", cli.save.display()))?;

    match cli.command {
        Commands::Overview => print_overview(&save),

        Commands::Products { family, raw } => {
            let family = Family::from(family);
            if raw {
                print_raw_records(&save, family);
            } else {
                print_products(save.products(family), family);
            }
        }

        Commands::Rank {
            family,
            property,
            pots,
            mixers,
            ovens,
            stations,
            cauldrons,
            customers,
            margin,
            sort,
            ascending,
            limit,
            what_if,
        } => {
            let family = Family::from(family);

            let mut context = ProductionContext::new(save.npcs.customers.len());
            let property = property.or_else(|| {
                properties::default_property(&save.properties).map(|p| p.id.clone())
            });
            context.select_property(property.as_deref());
            context.set_overrides(EquipmentOverrides {
                pots,
                mixers,
                ovens,
                stations,
                cauldrons,
            });
            if let Some(customers) = customers {
                context.set_customers(customers);
            }

            match context.property_id() {
                Some(id) => match save.property(id) {
                    Some(p) => println!("Property: {} ({})", p.name, p.id),
                    None => warn!("Property '{}' not found in save, counting no equipment", id),
                },
                None => println!("Property: none"),
            }
            if !context.overrides().is_empty() {
                println!("Equipment overrides: {:?}", context.overrides());
            }

            let mut products: Vec<Product> = save.products(family).to_vec();
            for hypothetical in what_if {
                let name = hypothetical.name.clone();
                match hypothetical.into_product(family) {
                    Some(product) => products.push(product),
                    None => warn!("'{}' is not based on a {} product, skipping", name, family),
                }
            }

            let profile = FamilyProfile::for_family(family);
            let mut report = calculator::compute_economics(
                &products,
                &profile,
                context.equipment(&save.properties),
                context.customers(),
                margin,
            );
            calculator::sort_products(&mut report.products, sort, ascending);
            if let Some(limit) = limit {
                report.products.truncate(limit);
            }

            println!("{}", report);
        }

        Commands::Properties => print_properties(&save),

        Commands::Dealers => {
            let reports = dealers::analyze_dealers(&save.npcs.dealers, &save.npcs.customers);
            if reports.is_empty() {
                println!("No dealers in save.");
            }
            for report in reports {
                let location = report.dealer.location.map_or("unknown area", |l| l.name());
                let status = if report.is_optimized { "optimized" } else { "not optimized" };
                let recruited = if report.dealer.recruited { "" } else { ", not recruited" };
                println!(
                    "{} [{}] - {}/{} customers, {}{}",
                    report.dealer.name,
                    location,
                    report.customers.len(),
                    catalog::DEALER_CAPACITY,
                    status,
                    recruited
                );
                for c in &report.customers {
                    let mark = if c.correctly_assigned { "ok" } else { "wrong area" };
                    println!("  {:<24} {}", c.name.as_deref().unwrap_or("(absent)"), mark);
                }
                for s in &report.suggestions {
                    println!(
                        "  swap {} -> {}",
                        s.replace_id,
                        s.with_name
                            .as_deref()
                            .or(s.with_id.as_deref())
                            .unwrap_or("(no ideal customer left)")
                    );
                }
            }
        }

        Commands::Customers => {
            if save.npcs.customers.is_empty() {
                println!("No active clients in save.");
            } else {
                println!(
                    "{:<22} {:<10} {:>9} {:>8}  {}",
                    "Customer", "Area", "Avg order", "Unlocked", "Orders"
                );
                println!("{}", "-".repeat(72));
            }
            for c in &save.npcs.customers {
                let area = catalog::npc_location(&c.id).map_or("-", |l| l.name());
                let orders: Vec<String> = c
                    .products
                    .iter()
                    .map(|p| format!("{} x{:.1}", p.id, p.amount))
                    .collect();
                println!(
                    "{:<22} {:<10} {:>9.1} {:>8}  {}",
                    c.name,
                    area,
                    c.average_order_quantity,
                    if c.unlocked { "yes" } else { "no" },
                    orders.join(", ")
                );
                if !c.product_affinities.is_empty() {
                    let affinities: Vec<String> = c
                        .product_affinities
                        .iter()
                        .zip(Family::ALL)
                        .map(|(a, f)| format!("{f} {a:+.2}"))
                        .collect();
                    println!("{:<22} affinity: {}", "", affinities.join(", "));
                }
            }
        }

        Commands::Suppliers => {
            for s in &save.npcs.suppliers {
                println!(
                    "{:<22} debt {:>8.0}  {}",
                    s.name,
                    s.debt,
                    if s.unlocked { "unlocked" } else { "locked" }
                );
            }
        }
    }

    Ok(())
}

fn print_overview(save: &ParsedSave) {
    let game = &save.metadata.game;
    let player = &save.metadata.player;
    let unknown = || "-".to_string();

    println!("=== {} ===", game.organisation_name.as_deref().unwrap_or(&save.root));
    println!("Seed:           {}", game.seed.map_or_else(unknown, |s| s.to_string()));
    println!("Created:        {}", game.creation_date.map_or_else(unknown, |d| d.to_string()));
    println!("Last played:    {}", game.last_played_date.map_or_else(unknown, |d| d.to_string()));
    println!("Days elapsed:   {}", game.elapsed_days.map_or_else(unknown, |d| d.to_string()));
    println!(
        "Playtime:       {}",
        game.playtime.map_or_else(unknown, |s| format!("{:.1}h", s / 3600.0))
    );
    println!();
    println!(
        "Rank:           {} (tier {})",
        player.rank.map_or_else(unknown, |r| r.to_string()),
        player.tier.map_or_else(unknown, |t| t.to_string())
    );
    println!(
        "XP:             {} (total {})",
        player.xp.map_or_else(unknown, |x| x.to_string()),
        player.total_xp.map_or_else(unknown, |x| x.to_string())
    );
    println!("Online balance: {}", player.online_balance.map_or_else(unknown, |m| format!("{m:.0}")));
    println!("Net worth:      {}", player.net_worth.map_or_else(unknown, |m| format!("{m:.0}")));
    println!(
        "Lifetime:       {}",
        player.lifetime_earnings.map_or_else(unknown, |m| format!("{m:.0}"))
    );
    println!();
    for family in Family::ALL {
        println!("{:<15} {}", format!("{family} products:"), save.products(family).len());
    }
    println!("{:<15} {}", "Customers:", save.npcs.customers.len());
    println!("{:<15} {}", "Dealers:", save.npcs.dealers.len());
    println!("{:<15} {}", "Suppliers:", save.npcs.suppliers.len());
    println!("{:<15} {}", "Properties:", save.properties.len());
    println!("{:<15} {}", "Workers:", save.worker_count());
}

fn print_products(products: &[Product], family: Family) {
    if products.is_empty() {
        println!("No {} products in save.", family);
        return;
    }

    println!("{:<24} {:<18} {:>7} {:>6}  Recipe", "Product", "Base", "Price", "Mix");
    println!("{}", "-".repeat(80));
    for p in products {
        let mut recipe: Vec<&str> = p
            .recipe_chain
            .steps
            .iter()
            .rev()
            .map(|s| s.additive_id.as_str())
            .collect();
        if let Some(terminal) = p.recipe_chain.terminal() {
            recipe.insert(0, &terminal.product_id);
        }
        let end = match p.recipe_chain.end {
            ChainEnd::NoRecipe | ChainEnd::BaseProduct => String::new(),
            other => format!(" (chain stops: {other:?})"),
        };
        println!(
            "{:<24} {:<18} {:>7.0} {:>6.0}  {}{}",
            p.name,
            p.base_name,
            p.sell_price,
            p.ingredient_cost,
            recipe.join(" + "),
            end
        );
        if !p.effects.is_empty() {
            println!("{:<24} effects: {}", "", p.effects.join(", "));
        }
    }
}

fn print_raw_records(save: &ParsedSave, family: Family) {
    println!("{} records (DrugType {})", family, family.tag());
    for r in save.raw_records(family) {
        let recipe = r.recipe.as_ref().map_or_else(String::new, |e| {
            format!("{} + {} -> {}", e.input_product_id, e.additive_id, e.output_id)
        });
        println!(
            "{:<20} {:<24} {:<16} {:<12} {:>7}  {}",
            r.id,
            r.name,
            r.data_type,
            r.game_version,
            r.sell_price.map_or_else(|| "-".to_string(), |p| format!("{p:.0}")),
            recipe
        );
        if !r.properties.is_empty() {
            println!("{:<20} properties: {}", "", r.properties.join(", "));
        }
    }
}

fn print_properties(save: &ParsedSave) {
    if save.properties.is_empty() {
        println!("No properties in save.");
    }
    for p in &save.properties {
        println!("{} ({})", p.name, p.id);

        let payroll: u32 = p.employees.iter().map(|e| e.salary).sum();
        println!("  Workers: {} (payroll {}/day)", p.employees.len(), payroll);
        for e in &p.employees {
            let kind = e.kind.map_or_else(|| "Unknown".to_string(), |k| k.to_string());
            println!("    {:<16} {:<10} {:>4}/day  [{}]", e.name, kind, e.salary, e.id);
        }

        println!("  Equipment:");
        for o in &p.objects {
            println!("    {:>3}x {}", o.amount, o.name);
        }
        let counts = calculator::count_equipment(&p.objects);
        println!(
            "  Production: {} pots, {} mixers, {} ovens, {} stations, {} cauldrons",
            counts.pots, counts.mixers, counts.ovens, counts.stations, counts.cauldrons
        );
    }
}
