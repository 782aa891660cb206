//! Interactive demo: register a password, then log in honestly or as an impostor.

use std::env;
use std::io::{self, BufRead, Write};

use num_bigint::BigUint;
use rpassword::prompt_password;
use zeroize::Zeroizing;
use zkp_schnorr_auth::logging::{LogConfig, init_tracing};
use zkp_schnorr_auth::schnorr::{
    AuthSession, Committer, FakeProver, FieldParameters, Prover, Verifier,
};
use zkp_schnorr_auth::{Result, ZkpError};

#[derive(Debug)]
struct Options {
    params: FieldParameters,
    verbose: bool,
    json: bool,
}

fn print_help() {
    println!("Usage: zkp-auth-sim [flags]");
    println!("  --modulus <n>          prime modulus p (default 48611)");
    println!("  --generator <n>        group generator g (default 19)");
    println!("  --challenge-bound <n>  challenges drawn from [1, n] (default 100)");
    println!("  --json                 print each round transcript as JSON");
    println!("  --verbose              protocol debug logging on stderr");
}

fn parse_number(flag: &str, value: Option<String>) -> std::result::Result<BigUint, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse::<BigUint>()
        .map_err(|_| format!("{flag}: '{value}' is not a non-negative integer"))
}

fn parse_args(args: Vec<String>) -> std::result::Result<Option<Options>, String> {
    let reference = FieldParameters::reference();
    let mut modulus = reference.modulus().clone();
    let mut generator = reference.generator().clone();
    let mut bound = reference.challenge_upper_bound().clone();
    let mut verbose = false;
    let mut json = false;

    let mut iter = args.into_iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--modulus" => modulus = parse_number(&flag, iter.next())?,
            "--generator" => generator = parse_number(&flag, iter.next())?,
            "--challenge-bound" => bound = parse_number(&flag, iter.next())?,
            "--verbose" => verbose = true,
            "--json" => json = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("unknown flag '{other}'")),
        }
    }

    let params = FieldParameters::new(modulus, generator, bound).map_err(|e| e.to_string())?;

    Ok(Some(Options { params, verbose, json }))
}

fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn register(params: &FieldParameters) -> Result<Prover> {
    let password = Zeroizing::new(prompt_password("Enter a password to register: ")?);
    if password.is_empty() {
        return Err(ZkpError::EmptyPassword);
    }
    Ok(Prover::new(params.clone(), &password))
}

/// Runs one round step by step so each message can be shown as it is sent.
fn attempt<C: Committer>(
    committer: &C,
    verifier: &Verifier,
    label: &str,
    json: bool,
) -> Result<bool> {
    let mut session = AuthSession::new(committer, verifier);

    let t = session.commit()?;
    println!("-> {label} sends Commitment (t): {t}");
    let c = session.issue_challenge()?;
    println!("<- Server sends Challenge (c): {c}");
    let s = session.respond()?;
    println!("-> {label} sends Response (s): {s}");
    let transcript = session.verify()?;

    if json {
        match serde_json::to_string(&transcript) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("failed to encode transcript: {err}"),
        }
    }
    Ok(transcript.accepted)
}

fn run(options: Options) -> Result<()> {
    let params = options.params;
    println!("--- ZKP AUTHENTICATION SYSTEM (SCHNORR) ---");
    println!(
        "Field: p = {}, g = {}, c in [1, {}]",
        params.modulus(),
        params.generator(),
        params.challenge_upper_bound()
    );

    let prover = register(&params)?;
    let public_key = prover.register();
    println!("\n[Database] Stored Public Key (y): {public_key}");
    println!("[Database] Server does NOT know the password.");
    println!("{}", "-".repeat(50));

    let verifier = Verifier::new(params.clone(), public_key);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("\nSELECT ACTION:");
        println!("1. Login as Legitimate User");
        println!("2. Attempt Hack (Man-in-the-Middle)");
        println!("3. Exit");
        print!("Option: ");
        io::stdout().flush()?;

        let Some(choice) = read_line(&mut input)? else {
            break;
        };
        match choice.as_str() {
            "1" => {
                println!("\n--- AUTHENTICATING USER ---");
                if attempt(&prover, &verifier, "Client", options.json)? {
                    println!(">> ACCESS GRANTED: Mathematical proof valid.");
                } else {
                    println!(">> ACCESS DENIED: Proof invalid.");
                }
            }
            "2" => {
                println!("\n--- ATTACK SIMULATION START ---");
                println!("Hacker trying to login using the User's public key...");
                let fake = FakeProver::new(params.clone());
                if attempt(&fake, &verifier, "Hacker", options.json)? {
                    println!(">> FATAL ERROR: Hacker bypassed security!");
                } else {
                    println!(">> ACCESS DENIED: The math didn't add up. Hacker caught.");
                }
            }
            "3" => break,
            other => println!("Unknown option '{other}'"),
        }
    }

    println!("Exiting.");
    Ok(())
}

fn main() {
    let options = match parse_args(env::args().skip(1).collect()) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_help();
            return;
        }
        Err(message) => {
            eprintln!("{message}");
            print_help();
            std::process::exit(2);
        }
    };

    let log_config = if options.verbose { LogConfig::verbose() } else { LogConfig::default() };
    if let Err(err) = init_tracing(&log_config) {
        eprintln!("{err}");
    }

    if let Err(err) = run(options) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
