//! CLI interface for Neurocode
//!
//! Provides command-line interface for:
//! - Classifying a code (simplicial, intersection completeness, convexity)
//! - Reducing a code to its canonical representative
//! - Testing two codes for isomorphism
//! - Enumerating images of a code and codes on a few neurons
//! - Sampling random codes

use crate::code::Code;
use crate::convexity::Convexity;
use crate::enumerate::{self, EnumerationConfig};
use crate::homology::{HomologyOracle, IntegralHomology};
use crate::report::CodeReport;
use clap::{Parser, Subcommand};
use std::io;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "neurocode")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Structural classification of combinatorial neural codes")]
#[command(
    long_about = "Neurocode - Structural classification of combinatorial neural codes\n\n\
    A neural code is a set of codewords, each codeword listing the neurons that fire\n\
    together. Codes are written as comma-separated codewords with optional braces;\n\
    the empty codeword is written Empty or left blank.\n\n\
    Key Features:\n\
    • Simplicial, intersection-complete and max-intersection-complete checks\n\
    • Mandatory codewords and local obstructions to convexity\n\
    • Canonical reduction through irreducible trunks\n\
    • Isomorphism up to relabelling of neurons\n\
    • Exhaustive enumeration of images and of small codes\n\n\
    Examples:\n\
      neurocode classify \"{1 2, 2 3, Empty}\"\n\
      neurocode reduce \"{1 2, 3, Empty}\"\n\
      neurocode isomorphic \"{1 2, 2, Empty}\" \"{1 3, 3, Empty}\"\n\
      neurocode enumerate -n 3 --connected -v"
)]
#[command(author = "Neurocode Contributors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a code and report its convexity verdict
    #[command(
        long_about = "Classify a code and report its convexity verdict\n\n\
        Reports the support, maximal codewords, simplicial and intersection completeness,\n\
        the intersections of maximal codewords that are missing, the mandatory codewords,\n\
        whether a local obstruction exists, and the reduced form.\n\n\
        Convexity verdicts:\n\
        • convex (1): every intersection of maximal codewords is a codeword\n\
        • non-convex (0): a mandatory codeword is missing\n\
        • inconclusive (-1): neither condition settles the question\n\n\
        Example:\n\
          neurocode classify \"{1 2, 2 3, Empty}\"\n\
          neurocode classify --json \"1 2 3, 1 2, 2 3, 2, Empty\""
    )]
    Classify {
        /// The code, e.g. "{1 2, 2 3, Empty}"
        #[arg(value_name = "CODE", help_heading = "Required")]
        code: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose output with timing
        #[arg(short, long)]
        verbose: bool,
    },

    /// Reduce a code to its canonical representative
    #[command(
        long_about = "Reduce a code to its canonical representative\n\n\
        Neurons whose trunks are intersections of larger trunks, duplicates of another\n\
        neuron, or shared by every codeword carry no extra information. The reduced\n\
        form keeps one neuron per irreducible trunk and relabels them 1..k.\n\n\
        Example:\n\
          neurocode reduce \"{1 2, 3, Empty}\""
    )]
    Reduce {
        /// The code to reduce
        #[arg(value_name = "CODE", help_heading = "Required")]
        code: String,

        /// Enable verbose output with timing
        #[arg(short, long)]
        verbose: bool,
    },

    /// Test whether two codes agree up to relabelling after reduction
    Isomorphic {
        /// First code
        #[arg(value_name = "A", help_heading = "Required")]
        a: String,

        /// Second code
        #[arg(value_name = "B", help_heading = "Required")]
        b: String,

        /// Enable verbose output showing the relabelling found
        #[arg(short, long)]
        verbose: bool,
    },

    /// Reduced homology of the complex spanned by the maximal codewords
    Homology {
        /// The code whose maximal codewords are the facets
        #[arg(value_name = "CODE", help_heading = "Required")]
        code: String,

        /// Enable verbose output with timing
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the distinct images of a code up to isomorphism
    #[command(
        long_about = "List the distinct images of a code up to isomorphism\n\n\
        Every subset of the code's distinct non-empty trunks defines a morphism onto a\n\
        code on fewer neurons. The images are listed one per isomorphism class.\n\n\
        Example:\n\
          neurocode images \"{1 2, 2 3, 2, Empty}\" --max-images 10"
    )]
    Images {
        /// The source code
        #[arg(value_name = "CODE", help_heading = "Required")]
        code: String,

        /// Stop after this many classes
        #[arg(long, value_name = "N")]
        max_images: Option<usize>,

        /// Enable verbose output with timing
        #[arg(short, long)]
        verbose: bool,
    },

    /// Enumerate codes on n neurons up to isomorphism
    #[command(
        long_about = "Enumerate codes on n neurons up to isomorphism\n\n\
        Every collection of subsets of 1..n that contains the empty codeword and uses\n\
        every neuron is considered; one representative per isomorphism class is printed\n\
        with its convexity verdict. Practical for n <= 4.\n\n\
        Example:\n\
          neurocode enumerate -n 3 --connected"
    )]
    Enumerate {
        /// Number of neurons
        #[arg(short = 'n', long, value_name = "N", help_heading = "Required")]
        neurons: u32,

        /// Keep only codes whose maximal codewords form a connected complex
        #[arg(long)]
        connected: bool,

        /// Keep codes with redundant neurons
        #[arg(long)]
        keep_redundant: bool,

        /// Enable verbose output with timing
        #[arg(short, long)]
        verbose: bool,
    },

    /// Sample random codes and report their convexity verdicts
    Sample {
        /// Number of neurons
        #[arg(short = 'n', long, value_name = "N", help_heading = "Required")]
        neurons: u32,

        /// Number of codes to draw
        #[arg(short, long, default_value_t = 10, value_name = "K")]
        count: u64,

        /// Seed of the first code; code k uses seed + k
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Percentage of subsets kept in each code
        #[arg(short, long, default_value_t = 50, value_name = "PERCENT")]
        density: u32,

        /// Enable verbose output with timing
        #[arg(short, long)]
        verbose: bool,
    },
}

fn banner(title: &str) {
    let line = format!("Neurocode v{} - {}", env!("CARGO_PKG_VERSION"), title);
    println!("{}", line);
    println!("{}", "=".repeat(line.len()));
}

pub fn run() -> io::Result<()> {
    let cli = Cli::parse();
    let started = Instant::now();

    match cli.command {
        Commands::Classify {
            code,
            json,
            verbose,
        } => {
            let code = Code::parse(&code)?;
            let report = CodeReport::from_code(&code);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            if verbose {
                banner("Classification");
            }
            println!("{}", report);
            if verbose {
                println!("\nClassified in {:.2?}", started.elapsed());
            }
            Ok(())
        }

        Commands::Reduce { code, verbose } => {
            if verbose {
                banner("Reduction");
            }
            let code = Code::parse(&code)?;
            let morphism = code.morphism(code.irreducible_trunks())?;
            let keys: Vec<String> = morphism.keys().iter().map(|k| k.to_string()).collect();
            println!("Code: {}", code);
            println!("Irreducible trunks: [{}]", keys.join(", "));
            println!("Reduced form: {}", code.reduced());
            if verbose {
                for (source, image) in morphism.pairs() {
                    println!("  {} -> {}", source, image);
                }
                println!("\nReduced in {:.2?}", started.elapsed());
            }
            Ok(())
        }

        Commands::Isomorphic { a, b, verbose } => {
            if verbose {
                banner("Isomorphism");
            }
            let a = Code::parse(&a)?;
            let b = Code::parse(&b)?;
            let isomorphic = a.is_isomorphic_to(&b);
            println!("{}", if isomorphic { "isomorphic" } else { "not isomorphic" });
            if verbose {
                println!("  Reduced A: {}", a.reduced());
                println!("  Reduced B: {}", b.reduced());
                if let Some(map) = crate::isomorphism::find_isomorphism(&a, &b) {
                    let pairs: Vec<String> =
                        map.iter().map(|(from, to)| format!("{} -> {}", from, to)).collect();
                    println!("  Relabelling: {}", pairs.join(", "));
                }
                println!("\nDecided in {:.2?}", started.elapsed());
            }
            Ok(())
        }

        Commands::Homology { code, verbose } => {
            if verbose {
                banner("Homology");
            }
            let code = Code::parse(&code)?;
            let complex = code.simplicial_complex();
            let oracle = IntegralHomology;
            println!("Facets: {}", code.maximal_codewords().len());
            println!("Components: {}", oracle.component_count(&complex));
            println!("Reduced homology: {}", oracle.reduced_homology(&complex));
            if verbose {
                println!("\nComputed in {:.2?}", started.elapsed());
            }
            Ok(())
        }

        Commands::Images {
            code,
            max_images,
            verbose,
        } => {
            if verbose {
                banner("Images");
            }
            let code = Code::parse(&code)?;
            let config = EnumerationConfig {
                max_images,
                ..EnumerationConfig::default()
            };
            let images = enumerate::images(&code, &config)?;
            for image in &images {
                println!("{}", image);
            }
            if verbose {
                println!("\n{} classes in {:.2?}", images.len(), started.elapsed());
            }
            Ok(())
        }

        Commands::Enumerate {
            neurons,
            connected,
            keep_redundant,
            verbose,
        } => {
            if verbose {
                banner("Enumeration");
            }
            let config = EnumerationConfig {
                neurons,
                require_connected: connected,
                skip_redundant: !keep_redundant,
                ..EnumerationConfig::default()
            };
            let codes = enumerate::codes_on(&config)?;
            for code in &codes {
                println!("{:>2}  {}", code.convexity().value(), code.compact());
            }
            if verbose {
                println!("\n{} classes in {:.2?}", codes.len(), started.elapsed());
            }
            Ok(())
        }

        Commands::Sample {
            neurons,
            count,
            seed,
            density,
            verbose,
        } => {
            if verbose {
                banner("Sampling");
            }
            let mut tally = [0usize; 3];
            for k in 0..count {
                let code = enumerate::random_code(neurons, density, seed.wrapping_add(k))?;
                let verdict = code.convexity();
                tally[match verdict {
                    Convexity::Convex => 0,
                    Convexity::NonConvex => 1,
                    Convexity::Inconclusive => 2,
                }] += 1;
                println!("{:>2}  {}", verdict.value(), code.compact());
            }
            if verbose {
                println!("\nConvex: {}", tally[0]);
                println!("Non-convex: {}", tally[1]);
                println!("Inconclusive: {}", tally[2]);
                println!("Sampled in {:.2?}", started.elapsed());
            }
            Ok(())
        }
    }
}
