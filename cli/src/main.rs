use clap::{arg, command, Parser, Subcommand};
use crossterm::{
    cursor::{MoveLeft, MoveRight, MoveUp},
    execute,
    style::{Attribute, Color as TermColor, SetBackgroundColor, Stylize},
};
use cube_assembly::{
    bridge::facelet_string_to_state,
    calculator::SolutionCalculator,
    config::{Algorithm, SolverConfig},
    error::Error,
    executor::apply_moves,
    facelet::{Color, CubeState, Face},
    scramble::{gen_scramble, scramble_from_str, scramble_to_str},
    validator::validate,
};
use spinners::Spinner;
use std::{
    io::{self, stdout},
    time::Instant,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "solves the cube")]
    #[clap(group(
    clap::ArgGroup::new("state")
        .required(true)
        .args(&["scramble", "facelet"]),
    ))]
    Solve {
        #[arg(short, long)]
        scramble: Option<String>,

        #[arg(short, long)]
        facelet: Option<String>,

        /// kociemba or layer-by-layer
        #[arg(short, long, default_value_t = Algorithm::TwoPhase)]
        algorithm: Algorithm,

        #[arg(short, long)]
        max_moves: Option<usize>,

        /// milliseconds
        #[arg(short, long, default_value_t = 5000)]
        timeout: u64,

        #[arg(short, long)]
        verbose: bool,

        #[arg(short, long)]
        preview: bool,
    },

    #[command(about = "generates scramble")]
    Scramble {
        #[arg(short, long, default_value_t = 20)]
        length: usize,
        #[arg(short, long)]
        preview: bool,
    },

    #[command(about = "checks a facelet string")]
    Validate {
        #[arg(short, long)]
        facelet: String,
    },
}

struct SolveArgs {
    algorithm: Algorithm,
    max_moves: Option<usize>,
    timeout: u64,
    verbose: bool,
    preview: bool,
}

async fn solve(
    scramble: &Option<String>,
    facelet: &Option<String>,
    args: SolveArgs,
) -> Result<(), Error> {
    let state = if let Some(scramble) = scramble {
        let scramble = scramble_from_str(scramble)?;
        apply_moves(&CubeState::solved(), &scramble)
    } else if let Some(facelet) = facelet {
        facelet_string_to_state(facelet)?
    } else {
        return Ok(());
    };
    if args.preview {
        print_state(&state)?;
    }
    solve_state(&state, args).await
}

async fn solve_state(state: &CubeState, args: SolveArgs) -> Result<(), Error> {
    let mut config = SolverConfig {
        timeout_ms: args.timeout,
        algorithm: args.algorithm,
        ..SolverConfig::default()
    };
    if let Some(max_moves) = args.max_moves {
        config.max_moves = max_moves;
        config.layer_by_layer_max_moves = max_moves;
    }
    let calculator = SolutionCalculator::new(config);

    let start = Instant::now();
    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Solving".to_owned());
    let result = calculator.calculate_solution(state).await;
    let end = Instant::now();
    spinner.stop_with_newline();
    let solution = result?;

    println!("Solution: {}", scramble_to_str(&solution.moves()));
    println!("Move count: {}", solution.total_moves);
    println!("Algorithm: {}", solution.algorithm_used);
    println!("Solve time: {:.1} ms", solution.calculation_time_ms);
    println!("Total time: {:?}", end - start);

    if args.verbose {
        for step in &solution.increments {
            println!("{:>3}. {:<3} {}", step.step_number, step.notation, step.description);
        }
    }

    Ok(())
}

fn color_to_termcolor(color: Option<Color>) -> TermColor {
    match color {
        Some(Color::White) => TermColor::White,
        Some(Color::Yellow) => TermColor::Yellow,
        Some(Color::Green) => TermColor::Green,
        Some(Color::Blue) => TermColor::Blue,
        Some(Color::Orange) => TermColor::Rgb {
            r: 255,
            g: 140,
            b: 0,
        },
        Some(Color::Red) => TermColor::Red,
        None => TermColor::DarkGrey,
    }
}

fn print_face(face: &[Option<Color>; 9], offset: u16) -> Result<(), io::Error> {
    for i in 0..3 {
        let layer = format!(
            "{}  {}  {}  {}",
            SetBackgroundColor(color_to_termcolor(face[3 * i])),
            SetBackgroundColor(color_to_termcolor(face[(3 * i) + 1])),
            SetBackgroundColor(color_to_termcolor(face[(3 * i) + 2])),
            SetBackgroundColor(TermColor::Reset)
        );

        println!("{layer}");

        if offset != 0 {
            execute!(stdout(), MoveRight(offset))?;
        }
    }

    Ok(())
}

fn print_state(state: &CubeState) -> Result<(), io::Error> {
    let stdout = stdout();
    let faces = &state.faces;

    println!();
    execute!(&stdout, MoveRight(6))?;
    print_face(&faces[Face::Up], 6)?;
    execute!(&stdout, MoveLeft(6))?;
    print_face(&faces[Face::Left], 0)?;
    execute!(&stdout, MoveRight(6), MoveUp(3))?;
    print_face(&faces[Face::Front], 6)?;
    execute!(&stdout, MoveLeft(12), MoveUp(3), MoveRight(12))?;
    print_face(&faces[Face::Right], 12)?;
    execute!(&stdout, MoveLeft(12), MoveUp(3), MoveRight(18))?;
    print_face(&faces[Face::Back], 18)?;
    execute!(&stdout, MoveLeft(12))?;
    print_face(&faces[Face::Down], 6)?;
    execute!(&stdout, MoveLeft(12))?;
    println!();

    Ok(())
}

fn scramble(length: usize, preview: bool) -> Result<(), Error> {
    let ss = gen_scramble(length);
    println!("Scramble: {}", scramble_to_str(&ss));
    if preview {
        print_state(&apply_moves(&CubeState::solved(), &ss))?;
    }
    Ok(())
}

fn check(facelet: &str) -> Result<(), Error> {
    let state = facelet_string_to_state(facelet)?;
    let result = validate(&state);
    if result.is_valid {
        println!("{}", "Valid".with(TermColor::Green));
        return Ok(());
    }
    println!("{}", "Invalid".with(TermColor::Red).attribute(Attribute::Bold));
    for error in &result.errors {
        println!("  {}: {}", error.code(), error);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let program = Cli::parse();

    let result = match &program.command {
        Some(Commands::Solve {
            scramble,
            facelet,
            algorithm,
            max_moves,
            timeout,
            verbose,
            preview,
        }) => {
            let args = SolveArgs {
                algorithm: *algorithm,
                max_moves: *max_moves,
                timeout: *timeout,
                verbose: *verbose,
                preview: *preview,
            };
            solve(scramble, facelet, args).await
        }
        Some(Commands::Scramble { length, preview }) => scramble(*length, *preview),
        Some(Commands::Validate { facelet }) => check(facelet),
        _ => Ok(()),
    };

    if let Err(error) = result {
        let styled = "Error:".with(TermColor::Red).attribute(Attribute::Bold);
        println!("{styled} {error}");
        for finding in error.validation_errors() {
            println!("  {}: {}", finding.code(), finding);
        }
    }
}
