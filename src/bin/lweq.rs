//! lweq CLI: key management, encryption and decryption over a
//! directory of persisted artifacts.
//!
//! Identifier-to-path resolution, overwrite preflight checks and file
//! I/O live here; the library stays filesystem-free.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::{eyre, Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use lweq::{
    decrypt, decrypt_with_fallback, encrypt, generate_keys, validate_modulus, ArtifactKind,
    Ciphertext, ClockSource, DirRepository, EntropySource, KeyRepository, PublicKey, RandomSource,
    SchemeParams, SecretKey,
};

#[derive(Parser)]
#[command(name = "lweq")]
#[command(about = "Toy LWE-style equation cipher (not secure)")]
#[command(version)]
struct Cli {
    /// Directory holding key and ciphertext files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Randomness strategy
    #[arg(long, value_enum, default_value = "entropy")]
    rng: RngKind,

    /// Fixed seed for reproducible runs (entropy strategy only)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum RngKind {
    /// ChaCha20 seeded from OS entropy
    Entropy,
    /// The reference timestamp digit-fold (not secure)
    Clock,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a key pair and persist both halves
    Keygen {
        #[arg(long)]
        modulus: u64,
        /// Key identifier; files land at <id>_private_key.txt and
        /// <id>_public_key.txt
        #[arg(long)]
        id: String,
    },
    /// Encrypt text against a stored public key
    Encrypt {
        /// Identifier of the public key
        #[arg(long)]
        key: String,
        /// Identifier for the ciphertext output
        #[arg(long)]
        id: String,
        #[arg(long)]
        text: String,
    },
    /// Decrypt a stored ciphertext with a stored private key
    Decrypt {
        /// Identifier of the private key
        #[arg(long)]
        key: String,
        /// Identifier of the ciphertext (output lands at
        /// <id>_decrypted.txt)
        #[arg(long)]
        id: String,
        /// Substitute random bits/characters for undecodable material
        /// instead of failing (reference behavior; substitutions are
        /// counted and logged)
        #[arg(long)]
        lenient: bool,
    },
    /// Validate a modulus and report its derived constants
    Check {
        #[arg(long)]
        modulus: u64,
    },
}

fn build_source(kind: RngKind, seed: Option<u64>) -> Box<dyn RandomSource> {
    match (kind, seed) {
        (RngKind::Entropy, Some(seed)) => Box::new(EntropySource::with_seed(seed)),
        (RngKind::Entropy, None) => Box::new(EntropySource::new()),
        (RngKind::Clock, _) => Box::new(ClockSource),
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let repo = DirRepository::new(&cli.dir);
    let mut source = build_source(cli.rng, cli.seed);

    match cli.command {
        Command::Keygen { modulus, id } => keygen(&repo, modulus, &id, source.as_mut()),
        Command::Encrypt { key, id, text } => {
            encrypt_cmd(&repo, &key, &id, &text, source.as_mut())
        }
        Command::Decrypt { key, id, lenient } => {
            decrypt_cmd(&repo, &key, &id, lenient, source.as_mut())
        }
        Command::Check { modulus } => check(modulus),
    }
}

fn keygen(
    repo: &DirRepository,
    modulus: u64,
    id: &str,
    source: &mut dyn RandomSource,
) -> Result<()> {
    for kind in [ArtifactKind::PrivateKey, ArtifactKind::PublicKey] {
        if repo.exists(kind, id) {
            return Err(eyre!(
                "refusing to overwrite {}",
                repo.path_for(kind, id).display()
            ));
        }
    }

    let (secret, public) = generate_keys(modulus, source)?;
    info!(modulus, id, "generated key pair");

    let secret_json = serde_json::to_vec(&secret).context("failed to serialize private key")?;
    repo.put(ArtifactKind::PrivateKey, id, &secret_json)
        .context("failed to store private key")?;
    let public_json = serde_json::to_vec(&public).context("failed to serialize public key")?;
    repo.put(ArtifactKind::PublicKey, id, &public_json)
        .context("failed to store public key")?;

    println!(
        "Private key: {}",
        repo.path_for(ArtifactKind::PrivateKey, id).display()
    );
    println!(
        "Public key: {}",
        repo.path_for(ArtifactKind::PublicKey, id).display()
    );
    Ok(())
}

fn encrypt_cmd(
    repo: &DirRepository,
    key_id: &str,
    id: &str,
    text: &str,
    source: &mut dyn RandomSource,
) -> Result<()> {
    let bytes = repo
        .get(ArtifactKind::PublicKey, key_id)
        .with_context(|| format!("failed to read public key '{key_id}'"))?;
    let public = PublicKey::from_json(&bytes)?;

    let ciphertext = encrypt(&public, text, source)?;
    info!(
        modulus = public.modulus(),
        chars = ciphertext.char_count(),
        "encrypted"
    );

    let json = serde_json::to_vec(&ciphertext).context("failed to serialize ciphertext")?;
    repo.put(ArtifactKind::Ciphertext, id, &json)
        .context("failed to store ciphertext")?;

    println!(
        "Encrypted text: {}",
        repo.path_for(ArtifactKind::Ciphertext, id).display()
    );
    Ok(())
}

fn decrypt_cmd(
    repo: &DirRepository,
    key_id: &str,
    id: &str,
    lenient: bool,
    source: &mut dyn RandomSource,
) -> Result<()> {
    let key_bytes = repo
        .get(ArtifactKind::PrivateKey, key_id)
        .with_context(|| format!("failed to read private key '{key_id}'"))?;
    let secret = SecretKey::from_json(&key_bytes)?;

    let ct_bytes = repo
        .get(ArtifactKind::Ciphertext, id)
        .with_context(|| format!("failed to read ciphertext '{id}'"))?;
    let ciphertext = Ciphertext::from_json(&ct_bytes)?;

    let plaintext = if lenient {
        let report = decrypt_with_fallback(&secret, &ciphertext, source)?;
        if !report.is_exact() {
            warn!(
                ambiguous_bits = report.ambiguous_bits,
                substituted_chars = report.substituted_chars,
                "decode produced guessed material"
            );
        }
        report.plaintext
    } else {
        decrypt(&secret, &ciphertext)?
    };

    repo.put(ArtifactKind::Plaintext, id, plaintext.as_bytes())
        .context("failed to store decrypted text")?;

    println!(
        "Decrypted text: {}",
        repo.path_for(ArtifactKind::Plaintext, id).display()
    );
    Ok(())
}

fn check(modulus: u64) -> Result<()> {
    let violations = validate_modulus(modulus);
    if violations.is_empty() {
        let params = SchemeParams::derive(modulus)?;
        println!("Max error: {}", params.max_error);
        println!("Error tolerance: {}", params.tolerance);
        println!("Max encapsulation: {}", params.component_limit);
        println!("Equation count: {}", params.equation_count);
    } else {
        for violation in &violations {
            println!("{violation}");
        }
    }
    Ok(())
}
