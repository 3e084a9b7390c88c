// fincalc - personal finance calculators from the command line

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fincalc::calculators::{
    age, emi, AgeInput, BmiInput, CartInput, CartItem, ContributionTiming, Deductions,
    DiscountInput, EfficiencyUnit, EmiInput, FuelInput, FuelType, GoldInput, GstInput, GstMode,
    PercentChangeInput, PercentOfInput, RatioInput, Regime, SipInput, TaxInput, TenureUnit,
    UnitSystem,
};
use fincalc::history::{
    calculations_for, clear_history, count_calculations, open_journal, recent_calculations,
    record_calculation, CalculationRecord,
};
use fincalc::{
    format_currency, format_number, number_to_words, parse_amount, AppConfig, CalculationOutcome,
    CalculationRequest, CalculationResult, Report, WordStyle,
};
use std::fs::File;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fincalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (otherwise FINCALC_CONFIG, ./fincalc.toml, then defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the raw result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Do not record this calculation in the history journal
    #[arg(long, global = true)]
    no_history: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Loan EMI, total interest and amortization schedule
    Emi {
        #[arg(long, value_parser = amount)]
        principal: f64,
        /// Annual interest rate in percent
        #[arg(long, value_parser = amount)]
        rate: f64,
        #[arg(long)]
        tenure: u32,
        /// Tenure is in months rather than years
        #[arg(long)]
        months: bool,
        /// Print the year-by-year schedule
        #[arg(long)]
        schedule: bool,
        /// Write the monthly schedule to a CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Add or extract GST
    Gst {
        #[arg(long, value_parser = amount)]
        amount: f64,
        #[arg(long, value_parser = amount, default_value = "18")]
        rate: f64,
        /// Amount already includes GST
        #[arg(long)]
        inclusive: bool,
    },

    /// Future value of a monthly SIP
    Sip {
        #[arg(long, value_parser = amount)]
        monthly: f64,
        /// Expected annual return in percent
        #[arg(long, value_parser = amount)]
        rate: f64,
        #[arg(long)]
        years: u32,
        /// Invest at the start of each month
        #[arg(long)]
        start_of_month: bool,
        /// Print the value at the end of every year
        #[arg(long)]
        breakdown: bool,
    },

    /// Income tax for one regime, or both with --compare
    Tax(TaxArgs),

    /// Body Mass Index
    Bmi {
        /// kg, or lb with --imperial
        #[arg(long, value_parser = amount)]
        weight: f64,
        /// cm, or inches with --imperial
        #[arg(long, value_parser = amount, required_unless_present = "feet")]
        height: Option<f64>,
        #[arg(long)]
        imperial: bool,
        /// Height in feet (implies --imperial)
        #[arg(long)]
        feet: Option<u32>,
        #[arg(long, requires = "feet", default_value_t = 0)]
        inches: u32,
    },

    /// Exact age and next birthday
    Age {
        /// Birth date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long, value_parser = date)]
        born: NaiveDate,
        /// Measure age on this date instead of today
        #[arg(long, value_parser = date)]
        on: Option<NaiveDate>,
    },

    /// Value of gold jewellery
    Gold {
        #[arg(long, value_parser = amount)]
        grams: f64,
        /// 24K rate per gram
        #[arg(long, value_parser = amount)]
        rate: f64,
        #[arg(long, default_value_t = 24.0)]
        karats: f64,
    },

    /// Trip fuel cost
    Fuel {
        /// km, or miles with --mpg
        #[arg(long, value_parser = amount)]
        distance: f64,
        /// km/l, or miles per gallon with --mpg
        #[arg(long, value_parser = amount)]
        efficiency: f64,
        /// Price per litre
        #[arg(long, value_parser = amount)]
        price: f64,
        #[arg(long)]
        mpg: bool,
        #[arg(long, value_enum, default_value_t = FuelArg::Petrol)]
        fuel: FuelArg,
    },

    /// Percentage helpers
    #[command(subcommand)]
    Percent(PercentCommand),

    /// Price after a discount
    Discount {
        #[arg(long, value_parser = amount)]
        price: f64,
        /// Percent off, or rupees off with --fixed
        #[arg(long, value_parser = amount)]
        discount: f64,
        #[arg(long)]
        fixed: bool,
        /// GST in percent applied after the discount
        #[arg(long, value_parser = amount)]
        gst: Option<f64>,
    },

    /// Total for several discounted items
    Cart {
        /// PRICE:DISCOUNT_PCT[:NAME], repeatable
        #[arg(long = "item", value_parser = cart_item, required = true)]
        items: Vec<CartItem>,
        #[arg(long, value_parser = amount)]
        gst: Option<f64>,
    },

    /// Spell out a number in Indian words
    Words {
        #[arg(value_parser = amount, allow_hyphen_values = true)]
        value: f64,
        /// currency, decimal, percent, years, months, days or any unit name
        #[arg(long, default_value = "currency")]
        style: String,
    },

    /// Show or clear recorded calculations
    History {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        /// Only this calculator (emi, gst, tax, ...)
        #[arg(long)]
        calculator: Option<String>,
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args, Debug)]
struct TaxArgs {
    #[arg(long, value_parser = amount)]
    income: f64,
    #[arg(long, value_enum, default_value_t = RegimeArg::New)]
    regime: RegimeArg,
    /// Claim the salaried standard deduction
    #[arg(long)]
    salaried: bool,
    /// Standard deduction for a non-salaried filer
    #[arg(long, value_parser = amount)]
    standard_deduction: Option<f64>,
    #[arg(long = "sec-80c", value_parser = amount, default_value = "0")]
    section_80c: f64,
    #[arg(long = "sec-80d", value_parser = amount, default_value = "0")]
    section_80d: f64,
    #[arg(long, value_parser = amount, default_value = "0")]
    hra: f64,
    #[arg(long, value_parser = amount, default_value = "0")]
    home_loan_interest: f64,
    /// Compare both regimes
    #[arg(long)]
    compare: bool,
}

#[derive(Subcommand, Debug)]
enum PercentCommand {
    /// X% of Y
    Of {
        #[arg(value_parser = amount)]
        percent: f64,
        #[arg(value_parser = amount)]
        value: f64,
    },
    /// Change from OLD to NEW
    Change {
        #[arg(value_parser = amount)]
        old: f64,
        #[arg(value_parser = amount)]
        new: f64,
    },
    /// X as a percentage of Y
    Ratio {
        #[arg(value_parser = amount)]
        part: f64,
        #[arg(value_parser = amount)]
        whole: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RegimeArg {
    New,
    Old,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FuelArg {
    Petrol,
    Diesel,
    Cng,
}

fn amount(text: &str) -> Result<f64, String> {
    parse_amount("value", text).map_err(|e| e.to_string())
}

fn date(text: &str) -> Result<NaiveDate, String> {
    age::parse_date("date", text).map_err(|e| e.to_string())
}

fn cart_item(text: &str) -> Result<CartItem, String> {
    let mut parts = text.splitn(3, ':');
    let price = amount(parts.next().unwrap_or_default())?;
    let discount_pct = match parts.next() {
        Some(d) => amount(d)?,
        None => 0.0,
    };
    let name = parts.next().map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

    Ok(CartItem {
        name,
        price,
        discount_pct,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let Some(request) = build_request(&cli.command) else {
        return match &cli.command {
            Command::Words { value, style } => run_words(*value, style),
            Command::History {
                limit,
                calculator,
                clear,
            } => run_history(&config, *limit, calculator.as_deref(), *clear),
            _ => Ok(()),
        };
    };

    let outcome = run_calculation(&cli, &config, &request)?;
    print_extras(&cli, &cli.command, &outcome)
}

/// None for the commands that are not calculations
fn build_request(command: &Command) -> Option<CalculationRequest> {
    let request = match command {
        Command::Emi {
            principal,
            rate,
            tenure,
            months,
            ..
        } => {
            let unit = if *months { TenureUnit::Months } else { TenureUnit::Years };
            CalculationRequest::Emi(EmiInput::new(*principal, *rate, *tenure, unit))
        }
        Command::Gst {
            amount,
            rate,
            inclusive,
        } => {
            let mode = if *inclusive { GstMode::Inclusive } else { GstMode::Exclusive };
            CalculationRequest::Gst(GstInput::new(*amount, *rate, mode))
        }
        Command::Sip {
            monthly,
            rate,
            years,
            start_of_month,
            ..
        } => {
            let timing = if *start_of_month {
                ContributionTiming::StartOfMonth
            } else {
                ContributionTiming::EndOfMonth
            };
            CalculationRequest::Sip(SipInput::new(*monthly, *rate, *years).with_timing(timing))
        }
        Command::Tax(args) => {
            let regime = match args.regime {
                RegimeArg::New => Regime::New,
                RegimeArg::Old => Regime::Old,
            };
            let mut input = TaxInput::new(args.income, regime).with_deductions(Deductions {
                section_80c: args.section_80c,
                section_80d: args.section_80d,
                hra_exemption: args.hra,
                housing_loan_interest: args.home_loan_interest,
            });
            if args.salaried {
                input = input.salaried();
            }
            input.standard_deduction = args.standard_deduction;

            if args.compare {
                CalculationRequest::TaxCompare(input)
            } else {
                CalculationRequest::Tax(input)
            }
        }
        Command::Bmi {
            weight,
            height,
            imperial,
            feet,
            inches,
        } => match (feet, height) {
            (Some(feet), _) => CalculationRequest::Bmi(BmiInput::imperial(*weight, *feet, *inches)),
            (None, Some(height)) if *imperial => CalculationRequest::Bmi(BmiInput {
                weight: *weight,
                height: *height,
                unit: UnitSystem::Imperial,
            }),
            (None, height) => {
                CalculationRequest::Bmi(BmiInput::metric(*weight, height.unwrap_or(0.0)))
            }
        },
        Command::Age { born, on } => {
            // Pin the date so the journal records what was actually computed
            let target = on.unwrap_or_else(|| Local::now().date_naive());
            CalculationRequest::Age(AgeInput::new(*born).on(target))
        }
        Command::Gold {
            grams,
            rate,
            karats,
        } => CalculationRequest::Gold(GoldInput::new(*grams, *rate, *karats)),
        Command::Fuel {
            distance,
            efficiency,
            price,
            mpg,
            fuel,
        } => {
            let mut input = FuelInput::new(*distance, *efficiency, *price).with_fuel(match fuel {
                FuelArg::Petrol => FuelType::Petrol,
                FuelArg::Diesel => FuelType::Diesel,
                FuelArg::Cng => FuelType::Cng,
            });
            if *mpg {
                input.unit = EfficiencyUnit::MilesPerGallon;
            }
            CalculationRequest::Fuel(input)
        }
        Command::Percent(PercentCommand::Of { percent, value }) => {
            CalculationRequest::PercentageOf(PercentOfInput {
                percent: *percent,
                value: *value,
            })
        }
        Command::Percent(PercentCommand::Change { old, new }) => {
            CalculationRequest::PercentageChange(PercentChangeInput {
                old_value: *old,
                new_value: *new,
            })
        }
        Command::Percent(PercentCommand::Ratio { part, whole }) => {
            CalculationRequest::PercentageRatio(RatioInput {
                numerator: *part,
                denominator: *whole,
            })
        }
        Command::Discount {
            price,
            discount,
            fixed,
            gst,
        } => {
            let input = if *fixed {
                DiscountInput::fixed(*price, *discount)
            } else {
                DiscountInput::percent(*price, *discount)
            };
            CalculationRequest::Discount(DiscountInput {
                gst_rate: *gst,
                ..input
            })
        }
        Command::Cart { items, gst } => CalculationRequest::DiscountCart(CartInput {
            items: items.clone(),
            gst_rate: *gst,
        }),
        Command::Words { .. } | Command::History { .. } => return None,
    };
    Some(request)
}

fn run_calculation(
    cli: &Cli,
    config: &AppConfig,
    request: &CalculationRequest,
) -> Result<CalculationOutcome> {
    let rules = config.tax_rules()?;

    let outcome = match request.run_with(&rules) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", Report::from(&outcome.result));
    }

    if config.history.enabled && !cli.no_history {
        if let Err(e) = journal(config, request, &outcome) {
            warn!(error = %e, "calculation not recorded");
        }
    }

    Ok(outcome)
}

fn journal(config: &AppConfig, request: &CalculationRequest, outcome: &CalculationOutcome) -> Result<()> {
    let conn = open_journal(&config.history.database_path)?;
    let record = CalculationRecord::new(request, outcome)?;
    record_calculation(&conn, &record)?;
    Ok(())
}

/// Detail that only the terminal view shows
fn print_extras(cli: &Cli, command: &Command, outcome: &CalculationOutcome) -> Result<()> {
    match (command, &outcome.result) {
        (
            Command::Emi {
                principal,
                rate,
                tenure,
                months,
                schedule,
                csv,
            },
            CalculationResult::Emi(_),
        ) if *schedule || csv.is_some() => {
            let unit = if *months { TenureUnit::Months } else { TenureUnit::Years };
            let input = EmiInput::new(*principal, *rate, *tenure, unit);
            let rows = emi::amortization_schedule(&input)?;

            if *schedule && !cli.json {
                println!("📅 Yearly Schedule");
                println!("{:>6}  {:>16}  {:>16}  {:>16}", "Year", "Principal", "Interest", "Balance");
                for year in emi::yearly_summary(&rows) {
                    println!(
                        "{:>6}  {:>16}  {:>16}  {:>16}",
                        year.year,
                        format_currency(year.principal_paid),
                        format_currency(year.interest_paid),
                        format_currency(year.closing_balance)
                    );
                }
            }

            if let Some(path) = csv {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                emi::write_schedule_csv(file, &rows)?;
                println!("✓ Schedule written to {} ({} months)", path.display(), rows.len());
            }
        }
        (Command::Sip { breakdown: true, .. }, CalculationResult::Sip(result)) if !cli.json => {
            println!("📊 Year by Year");
            println!("{:>6}  {:>16}  {:>16}  {:>16}", "Year", "Invested", "Value", "Returns");
            for year in &result.yearly_breakdown {
                println!(
                    "{:>6}  {:>16}  {:>16}  {:>16}",
                    year.year,
                    format_currency(year.invested),
                    format_currency(year.future_value),
                    format_currency(year.returns)
                );
            }
        }
        (Command::Tax(_), CalculationResult::Tax(result)) if !cli.json => {
            println!("📊 Slab Breakdown");
            for slab in &result.breakdown {
                let upper = slab
                    .to
                    .map(|to| format_number(to, 0))
                    .unwrap_or_else(|| "above".to_string());
                println!(
                    "  {:>12} - {:<12} @ {:>4}%  {}",
                    format_number(slab.from, 0),
                    upper,
                    slab.rate_pct,
                    format_currency(slab.tax)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn run_words(value: f64, style: &str) -> Result<()> {
    let style: WordStyle = style.parse().unwrap_or(WordStyle::Currency);
    println!("🔤 {}", format_number(value, 2));
    println!("   {}", number_to_words(value, &style));
    Ok(())
}

fn run_history(config: &AppConfig, limit: usize, calculator: Option<&str>, clear: bool) -> Result<()> {
    let conn = open_journal(&config.history.database_path)?;

    if clear {
        let removed = clear_history(&conn)?;
        println!("🗑️  Cleared {} calculations", removed);
        return Ok(());
    }

    let records = match calculator {
        Some(name) => {
            let mut records = calculations_for(&conn, name)?;
            records.truncate(limit);
            records
        }
        None => recent_calculations(&conn, limit)?,
    };
    let total = count_calculations(&conn)?;

    println!("🗂️  Calculation History ({} of {})", records.len(), total);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for record in records {
        println!(
            "{}  {:<18} {}",
            record.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            record.calculator,
            record.request
        );
    }
    Ok(())
}
