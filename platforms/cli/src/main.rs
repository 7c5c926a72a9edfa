use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use turing_sim::{
    MachineConfig, MachineError, Mode, Program, ProgramLoader, ProgramManager, Run, Step,
    TuringMachine, Verdict, MAX_EXECUTION_STEPS,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The ruleset file (state -> symbol -> rule) to execute
    #[clap(short, long, default_value = "ruleset.json")]
    rules: PathBuf,

    /// A complete program file (states, accept/reject, input, and rules)
    #[clap(short, long)]
    program: Option<PathBuf>,

    /// Run one of the built-in programs by name
    #[clap(short, long)]
    builtin: Option<String>,

    /// List the built-in programs and exit
    #[clap(long)]
    list: bool,

    /// The input string written on the tape
    #[clap(short, long)]
    input: Option<String>,

    /// The valid states, comma separated (e.g. s1,s2,sAccept,sReject)
    #[clap(short, long, value_delimiter = ',')]
    states: Vec<String>,

    /// The start state (defaults to the first declared state)
    #[clap(long)]
    start: Option<String>,

    /// The accept state
    #[clap(short, long)]
    accept: Option<String>,

    /// The reject state
    #[clap(short = 'x', long)]
    reject: Option<String>,

    /// Treat missing rules and undeclared states as errors
    #[clap(long)]
    strict: bool,

    /// Maximum number of steps before giving up
    #[clap(short, long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    if cli.list {
        for name in ProgramManager::list_program_names() {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(Run::Halted(Verdict::Accepted)) => {
            println!("String Accepted ✅");
            ExitCode::SUCCESS
        }
        Ok(Run::Halted(Verdict::Rejected)) => {
            println!("String Rejected ❌");
            ExitCode::from(1)
        }
        Ok(Run::Exhausted { steps }) => {
            println!("No verdict after {} steps", steps);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Machine error: {}", e);
            ExitCode::from(3)
        }
    }
}

fn run(cli: &Cli) -> Result<Run, MachineError> {
    let mut program = load(cli)?;

    if let Some(input) = &cli.input {
        program.input = input.clone();
    }
    if cli.strict {
        program.config.mode = Mode::Strict;
    }

    let mut machine = program.machine()?;

    if !cli.debug {
        return machine.run_with_limit(cli.max_steps);
    }

    print_state(&machine);
    for _ in 0..cli.max_steps {
        match machine.step()? {
            Step::Continue => print_state(&machine),
            Step::Stall => println!("No rule for ({}, '{}')", machine.state(), machine.symbol()),
            Step::Halt(verdict) => {
                print_state(&machine);
                println!("\nMachine halted.");
                println!("{}", machine.tape_as_string());
                return Ok(Run::Halted(verdict));
            }
        }
    }

    Ok(Run::Exhausted {
        steps: cli.max_steps,
    })
}

fn load(cli: &Cli) -> Result<Program, MachineError> {
    if let Some(name) = &cli.builtin {
        return ProgramManager::get_program_by_name(name);
    }

    if let Some(path) = &cli.program {
        return ProgramLoader::load_program(path);
    }

    println!("Loading rule set from {}...", cli.rules.display());
    let rules = ProgramLoader::load_ruleset(&cli.rules)?;
    println!("Ruleset loaded completely");

    let (Some(accept), Some(reject)) = (&cli.accept, &cli.reject) else {
        return Err(MachineError::InvalidConfig(
            "--accept and --reject are required with --rules".to_string(),
        ));
    };

    Ok(Program {
        name: cli.rules.display().to_string(),
        config: MachineConfig {
            states: cli.states.clone(),
            start: cli.start.clone(),
            accept: accept.clone(),
            reject: reject.clone(),
            mode: Mode::default(),
        },
        input: String::new(),
        rules,
    })
}

fn print_state(machine: &TuringMachine) {
    println!(
        "Step: {}, State: {}, Tape: {}, Head: {}",
        machine.step_count(),
        machine.state(),
        machine.tape_as_string(),
        machine.head()
    );
}
