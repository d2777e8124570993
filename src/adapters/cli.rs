use clap::Parser;
use log::debug;
use std::fs;
use std::io::{self, Read};

use crate::adapters::share::share_text;
use crate::catalog::{ChemicalProduct, ProductCatalog, ProductDraft};
use crate::error::AppError;
use crate::history::History;
use crate::models::{Measurements, Pool, TreatmentResult, VisualState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Pool water treatment calculator — dosing steps from test-kit readings", long_about = None)]
pub struct Args {
    #[arg(long, help = "Print the result as JSON")]
    json: bool,
    #[arg(long, conflicts_with = "json", help = "Print the result as shareable text")]
    share: bool,
    #[arg(
        long,
        value_name = "FILE",
        help = "JSON document with pool, measurements and optional visual, products, history, edit_id; '-' reads from stdin"
    )]
    input: Option<String>,
    #[arg(long, value_name = "JSON", help = "Inline JSON for the pool (overrides --input)")]
    pool_json: Option<String>,
    #[arg(long, value_name = "JSON", help = "Inline JSON for the measurements")]
    measurements_json: Option<String>,
    #[arg(long, value_name = "JSON", help = "Inline JSON for the visual state (default: clear water)")]
    visual_json: Option<String>,
    #[arg(long, value_name = "JSON", help = "Inline JSON array of user products")]
    products_json: Option<String>,
    #[arg(long, value_name = "ID", help = "Recalculate an existing result, keeping its id")]
    edit_id: Option<String>,
}

/// Everything one calculation needs, after boundary validation.
#[derive(Debug)]
pub struct Request {
    pub pool: Pool,
    pub measurements: Measurements,
    pub visual: VisualState,
    pub catalog: ProductCatalog,
    pub history: History,
    pub edit_id: Option<String>,
}

#[derive(serde::Deserialize)]
struct CmdInput {
    pool: Pool,
    measurements: Measurements,
    #[serde(default)]
    visual: VisualState,
    #[serde(default)]
    products: Vec<ChemicalProduct>,
    #[serde(default)]
    history: History,
    #[serde(default)]
    edit_id: Option<String>,
}

fn inline<T: serde::de::DeserializeOwned>(flag: &'static str, json: &str) -> Result<T, AppError> {
    serde_json::from_str(json).map_err(|source| AppError::ParseInlineJson { flag, source })
}

fn parse_inline_inputs(args: &Args, pool_json: &str) -> Result<CmdInput, AppError> {
    let Some(measurements_json) = args.measurements_json.as_deref() else {
        return Err(AppError::MissingInputData);
    };
    Ok(CmdInput {
        pool: inline("pool-json", pool_json)?,
        measurements: inline("measurements-json", measurements_json)?,
        visual: match args.visual_json.as_deref() {
            Some(s) => inline("visual-json", s)?,
            None => VisualState::default(),
        },
        products: match args.products_json.as_deref() {
            Some(s) => inline("products-json", s)?,
            None => Vec::new(),
        },
        history: History::new(),
        edit_id: None,
    })
}

fn parse_cmd_input_doc(doc: &str) -> Result<CmdInput, AppError> {
    serde_json::from_str(doc).map_err(|source| AppError::ParseCmdInputJson { source })
}

/// User products go through the same checks as the product editor.
fn validated_catalog(products: Vec<ChemicalProduct>) -> Result<ProductCatalog, AppError> {
    let checked = products
        .iter()
        .filter(|p| !p.is_default)
        .map(|p| ProductDraft::from_product(p).build())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ProductCatalog::from_products(checked))
}

pub fn parse_inputs(args: &Args) -> Result<Request, AppError> {
    let parsed = match (&args.pool_json, &args.input) {
        (Some(pool_json), _) => parse_inline_inputs(args, pool_json)?,
        (None, Some(path)) if path == "-" => {
            let mut s = String::new();
            io::stdin()
                .read_to_string(&mut s)
                .map_err(|source| AppError::ReadStdin { source })?;
            parse_cmd_input_doc(&s)?
        }
        (None, Some(path)) => {
            let s = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
                path: path.clone(),
                source,
            })?;
            parse_cmd_input_doc(&s)?
        }
        (None, None) => return Err(AppError::MissingInputData),
    };

    parsed.pool.validate()?;
    let catalog = validated_catalog(parsed.products)?;
    debug!(
        "pool '{}' ({} L), {} user product(s), {} history entr(ies)",
        parsed.pool.name,
        parsed.pool.volume_l,
        catalog.overrides().len(),
        parsed.history.len()
    );

    Ok(Request {
        pool: parsed.pool,
        measurements: parsed.measurements,
        visual: parsed.visual,
        catalog,
        history: parsed.history,
        edit_id: args.edit_id.clone().or(parsed.edit_id),
    })
}

pub fn print_output(out: &TreatmentResult, args: &Args) -> Result<(), AppError> {
    if args.json {
        let s = serde_json::to_string_pretty(&out)
            .map_err(|source| AppError::SerializeOutput { source })?;
        println!("{}", s);
    } else if args.share {
        println!("{}", share_text(out));
    } else {
        println!("Status: {:?}", out.status);
        println!("{}", out.summary);
        for step in &out.steps {
            println!();
            if step.is_advisory() {
                println!("{}. {}: {}", step.order, step.title, step.product);
            } else {
                println!(
                    "{}. {}: {} {} of {}",
                    step.order, step.title, step.dose, step.unit, step.product
                );
            }
            println!("   {}", step.instruction);
            println!("   Wait: {}", step.wait_duration);
        }
    }

    Ok(())
}
