//! # Tally CLI Application
//!
//! Terminal interface for contractor material estimates. Runs the concrete
//! calculator end-to-end from a few prompts and prints both a human-readable
//! bill of materials and the JSON payload.

use std::io::{self, BufRead, Write};

use estimate_core::calculators::concrete::{
    calculate, BagSize, ConcreteGeometry, ConcreteInput, Delivery,
};
use estimate_core::line_items::LineItem;
use estimate_core::pricing::PriceBook;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_choice(prompt: &str, default: char) -> char {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().chars().next().unwrap_or(default)
}

fn print_items(items: &[LineItem]) {
    println!("═══════════════════════════════════════════════════");
    println!("  BILL OF MATERIALS");
    println!("═══════════════════════════════════════════════════");
    for item in items {
        if item.is_warning {
            println!("  ⚠ {}", item.label);
        } else if item.is_total {
            println!("  ───────────────────────────────────────────");
            println!("  {:<32} ${:>10.2}", item.label, item.value);
        } else {
            let cost = item
                .cost
                .map(|c| format!("${:>10.2}", c))
                .unwrap_or_else(|| " ".repeat(11));
            println!("  {:<24} {:>8.2} {:<8} {}", item.label, item.value, item.unit, cost);
        }
    }
    println!("═══════════════════════════════════════════════════");
}

fn main() {
    println!("Tally CLI - Contractor Material Estimator");
    println!("=========================================");
    println!();
    println!("Concrete estimate demo (default pricing).");
    println!();

    let length_ft = prompt_f64("Slab length (ft) [10.0]: ", 10.0);
    let width_ft = prompt_f64("Slab width (ft) [10.0]: ", 10.0);
    let depth_in = prompt_f64("Slab depth (in) [4.0]: ", 4.0);
    let delivery = match prompt_choice("Delivery - (t)ruck or (b)ags [t]: ", 't') {
        'b' | 'B' => Delivery::Bags {
            bag_size: BagSize::Eighty,
        },
        _ => Delivery::Truck,
    };

    let input = ConcreteInput {
        label: "CLI Demo".to_string(),
        geometry: ConcreteGeometry::Flatwork {
            length_ft: Some(length_ft),
            width_ft: Some(width_ft),
            depth_in: Some(depth_in),
        },
        delivery,
        ..ConcreteInput::default()
    };

    println!();
    match calculate(&input, &PriceBook::defaults()) {
        Ok(items) => {
            print_items(&items);

            println!();
            println!("JSON Output (for API use):");
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            std::process::exit(1);
        }
    }
}
