use anyhow::{anyhow, Context, Result};
use candle::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5::{Config as T5Config, T5ForConditionalGeneration};
use std::fs;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{info, warn};

use super::{TextGenerator, MAX_INPUT_TOKENS, MAX_OUTPUT_LENGTH};
use crate::config::DevicePreference;

/// Fine-tuned T5 checkpoint, loaded once and never mutated afterwards.
pub struct T5Service {
    model: T5ForConditionalGeneration,
    config: T5Config,
    tokenizer: Tokenizer,
    device: Device,
}

impl T5Service {
    pub fn load(snapshot_dir: &Path, device: Device) -> Result<Self> {
        if !snapshot_dir.is_dir() {
            return Err(anyhow!(
                "model directory not found: {}",
                snapshot_dir.display()
            ));
        }

        let tokenizer = load_tokenizer(snapshot_dir)?;
        let config = load_config(snapshot_dir)?;

        let weights = find_model_weights(snapshot_dir)?;
        info!(
            "T5 weights: {} file(s) from {}",
            weights.len(),
            snapshot_dir.display()
        );

        let vb = build_var_builder(&weights, DType::F32, &device)?;
        let model = T5ForConditionalGeneration::load(vb, &config)
            .with_context(|| format!("failed to build T5 from {}", snapshot_dir.display()))?;

        info!("T5 classifier loaded on {device:?}");

        Ok(Self {
            model,
            config,
            tokenizer,
            device,
        })
    }

    /// Greedy decode. The model is cloned per call so every request owns its KV cache;
    /// weights are shared.
    pub fn generate_greedy(&self, prompt: &str) -> Result<String> {
        let enc = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| anyhow!("T5 encode error: {e}"))?;

        let input_ids = Tensor::new(enc.get_ids(), &self.device)?.unsqueeze(0)?;

        let mut model = self.model.clone();
        let encoder_output = model.encode(&input_ids)?;

        let start = self
            .config
            .decoder_start_token_id
            .unwrap_or(self.config.pad_token_id) as u32;
        let mut logits_processor = LogitsProcessor::new(0, None, None);

        let output_ids = greedy_decode(
            start,
            self.config.eos_token_id as u32,
            MAX_OUTPUT_LENGTH,
            |sequence| {
                let decoder_ids = if sequence.len() == 1 || !self.config.use_cache {
                    Tensor::new(sequence, &self.device)?.unsqueeze(0)?
                } else {
                    let last = sequence[sequence.len() - 1];
                    Tensor::new(&[last], &self.device)?.unsqueeze(0)?
                };

                let logits = model
                    .decode(&decoder_ids, &encoder_output)?
                    .squeeze(0)?
                    .to_dtype(DType::F32)?;

                Ok(logits_processor.sample(&logits)?)
            },
        )?;

        self.tokenizer
            .decode(&output_ids, true)
            .map_err(|e| anyhow!("T5 decode error: {e}"))
    }
}

impl TextGenerator for T5Service {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_greedy(prompt)
    }
}

/// Runs `step` until it yields `eos` or the sequence, start token included, reaches
/// `max_len`. `step` sees the whole sequence so far and returns the next id.
fn greedy_decode<F>(start: u32, eos: u32, max_len: usize, mut step: F) -> Result<Vec<u32>>
where
    F: FnMut(&[u32]) -> Result<u32>,
{
    let mut output_ids = vec![start];
    while output_ids.len() < max_len {
        let next = step(&output_ids)?;
        output_ids.push(next);
        if next == eos {
            break;
        }
    }
    Ok(output_ids)
}

fn load_tokenizer(snapshot: &Path) -> Result<Tokenizer> {
    let tokenizer_path = snapshot.join("tokenizer.json");
    if !tokenizer_path.exists() {
        return Err(anyhow!(
            "tokenizer.json not found under {}; a checkpoint saved with the slow \
             sentencepiece tokenizer (spiece.model) must be re-exported with \
             T5TokenizerFast.save_pretrained",
            snapshot.display()
        ));
    }

    let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| anyhow!("Tokenizer load failed ({}): {e}", tokenizer_path.display()))?;
    // A single sequence never needs padding.
    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_INPUT_TOKENS,
            ..Default::default()
        }))
        .map_err(|e| anyhow!("Tokenizer truncation setup failed: {e}"))?;

    Ok(tokenizer)
}

fn load_config(snapshot: &Path) -> Result<T5Config> {
    let path = snapshot.join("config.json");
    if !path.exists() {
        return Err(anyhow!(
            "config.json not found under {}",
            snapshot.display()
        ));
    }
    let raw = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Single safetensors file, a sharded safetensors index, or a pytorch checkpoint.
fn find_model_weights(snapshot: &Path) -> Result<Vec<PathBuf>> {
    let single = snapshot.join("model.safetensors");
    if single.exists() {
        return Ok(vec![single]);
    }

    let index_path = snapshot.join("model.safetensors.index.json");
    if index_path.exists() {
        let index_json: serde_json::Value = serde_json::from_slice(&fs::read(&index_path)?)
            .with_context(|| format!("failed to parse {}", index_path.display()))?;

        let mut shards = index_json["weight_map"]
            .as_object()
            .ok_or_else(|| anyhow!("T5 index.json: weight_map is not an object"))?
            .values()
            .map(|v| {
                let file = v
                    .as_str()
                    .ok_or_else(|| anyhow!("invalid shard entry in T5 index.json"))?;
                Ok(snapshot.join(file))
            })
            .collect::<Result<Vec<_>>>()?;
        shards.sort();
        shards.dedup();
        return Ok(shards);
    }

    let pth = snapshot.join("pytorch_model.bin");
    if pth.exists() {
        return Ok(vec![pth]);
    }

    Err(anyhow!("no model weights found under {}", snapshot.display()))
}

fn build_var_builder(
    files: &[PathBuf],
    dtype: DType,
    device: &Device,
) -> Result<VarBuilder<'static>> {
    match files {
        [single] if single.extension().and_then(|s| s.to_str()) == Some("bin") => {
            VarBuilder::from_pth(single, dtype, device)
                .map_err(|e| anyhow!("failed to load {}: {e}", single.display()))
        }
        _ => unsafe {
            VarBuilder::from_mmaped_safetensors(files, dtype, device)
                .map_err(|e| anyhow!("failed to mmap T5 weights: {e}"))
        },
    }
}

/// Picked once at startup; the process keeps the result.
pub fn select_device(preference: &DevicePreference) -> Result<Device> {
    match preference {
        DevicePreference::Cpu => Ok(Device::Cpu),
        DevicePreference::Cuda(ordinal) => Device::new_cuda(*ordinal).map_err(|err| {
            anyhow!(
                "failed to initialize CUDA device {ordinal} ({err}). Build with the `cuda` \
                 feature and ensure CUDA libraries are available."
            )
        }),
        DevicePreference::Auto => match Device::cuda_if_available(0) {
            Ok(device) => Ok(device),
            Err(err) => {
                warn!("CUDA unavailable ({err}), falling back to CPU");
                Ok(Device::Cpu)
            }
        },
    }
}
