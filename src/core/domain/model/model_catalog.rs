//! Downloadable model presets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which model directory a download lands in on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// GGUF language model, saved with a `.gguf` extension.
    #[default]
    Llm,
    /// Stable Diffusion checkpoint, saved with a `.safetensors` extension.
    Sd,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelType::Llm => "llm",
            ModelType::Sd => "sd",
        })
    }
}

/// A curated model with a known download URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetModel {
    pub group: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub filename: &'static str,
}

pub const PRESET_MODELS: &[PresetModel] = &[
    PresetModel {
        group: "Medium models",
        name: "Llama 3.1 8B",
        url: "https://huggingface.co/bartowski/Meta-Llama-3.1-8B-Instruct-GGUF/resolve/main/Meta-Llama-3.1-8B-Instruct-Q4_K_M.gguf?download=true",
        filename: "llama3.1-8b",
    },
    PresetModel {
        group: "Medium models",
        name: "Qwen 2.5 7B",
        url: "https://huggingface.co/lmstudio-community/Qwen2.5-7B-Instruct-GGUF/resolve/main/Qwen2.5-7B-Instruct-Q4_K_M.gguf?download=true",
        filename: "qwen2.5-7b",
    },
    PresetModel {
        group: "Medium models",
        name: "DeepSeek R1 Distill Llama 8B",
        url: "https://huggingface.co/lmstudio-community/DeepSeek-R1-Distill-Llama-8B-GGUF/resolve/main/DeepSeek-R1-Distill-Llama-8B-Q4_K_M.gguf?download=true",
        filename: "deepseek-r1-distill-llama-8b",
    },
    PresetModel {
        group: "Medium models",
        name: "Gemma 2 9B it",
        url: "https://huggingface.co/bartowski/gemma-2-9b-it-GGUF/resolve/main/gemma-2-9b-it-Q4_K_M.gguf?download=true",
        filename: "gemma2-9b-it",
    },
    PresetModel {
        group: "Small models",
        name: "Llama 3.2 3B",
        url: "https://huggingface.co/hugging-quants/Llama-3.2-3B-Instruct-Q4_K_M-GGUF/resolve/main/llama-3.2-3b-instruct-q4_k_m.gguf",
        filename: "llama3.2-3b",
    },
    PresetModel {
        group: "Small models",
        name: "Qwen 2.5 3B",
        url: "https://huggingface.co/Qwen/Qwen2.5-3B-Instruct-GGUF/resolve/main/qwen2.5-3b-instruct-q4_k_m.gguf?download=true",
        filename: "qwen2.5-3b",
    },
    PresetModel {
        group: "Tiny models",
        name: "Llama 3.2 1B",
        url: "https://huggingface.co/hugging-quants/Llama-3.2-1B-Instruct-Q4_K_M-GGUF/resolve/main/llama-3.2-1b-instruct-q4_k_m.gguf",
        filename: "llama3.2-1b",
    },
    PresetModel {
        group: "Tiny models",
        name: "Qwen 2 0.5B",
        url: "https://huggingface.co/Qwen/Qwen2-0.5B-Instruct-GGUF/resolve/main/qwen2-0_5b-instruct-q4_k_m.gguf?download=true",
        filename: "qwen2-0.5b",
    },
];

/// Looks up a preset by its display name.
pub fn find_preset(name: &str) -> Option<&'static PresetModel> {
    PRESET_MODELS.iter().find(|p| p.name == name)
}
