// src/llm/ollama.rs
//
// Client for the local Ollama HTTP API: availability probe plus streaming
// and one-shot generation. Streaming responses arrive as newline-delimited
// JSON; each line may carry a `response` text fragment.

use crate::config::Config;
use crate::error::Result;
use anyhow::Context;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

// --- Request / Response Structs ---

#[derive(Serialize, Debug)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct GenerateChunk {
    // Absent on metadata-only lines (e.g. the final "done" line).
    response: Option<String>,
}

// --- Availability Probe ---

/// True only when `GET /api/tags` answers 200 within the probe timeout.
/// Every transport failure (refused, timeout, DNS) maps to `false`; this
/// never returns an error to the caller.
#[instrument(skip(client, config))]
pub async fn check_available(client: &Client, config: &Config) -> bool {
    let url = format!("{}/api/tags", config.ollama_base_url);
    debug!("Probing Ollama at {}", url);

    match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => {
            let ok = response.status() == reqwest::StatusCode::OK;
            if !ok {
                warn!("Ollama probe returned status {}", response.status());
            }
            ok
        }
        Err(e) => {
            warn!("Ollama probe failed: {}", e);
            false
        }
    }
}

// --- Streaming Generation ---

/// Pull-based sequence of text fragments from one in-flight generation
/// request. Single-pass: fragments are yielded in arrival order and cannot
/// be replayed.
pub struct FragmentStream {
    body: futures_util::stream::BoxStream<'static, reqwest::Result<bytes::Bytes>>,
    decoder: LineDecoder,
    pending: VecDeque<String>,
    done: bool,
}

impl FragmentStream {
    /// Next text fragment, or `None` once the response body is exhausted.
    pub async fn next_fragment(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Ok(Some(fragment));
            }
            if self.done {
                return Ok(None);
            }
            match self.body.next().await {
                Some(chunk) => {
                    let chunk = chunk.context("Failed to read streamed response from Ollama")?;
                    self.decoder.push(&chunk, &mut self.pending)?;
                }
                None => {
                    self.done = true;
                    self.decoder.finish(&mut self.pending)?;
                }
            }
        }
    }
}

/// Reassembles newline-delimited JSON from arbitrarily split byte chunks.
/// Buffers raw bytes so a multi-byte character straddling a chunk boundary
/// is only decoded once its line is complete. Kept separate from the
/// network path so framing is testable on its own.
#[derive(Default)]
struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    fn push(&mut self, chunk: &[u8], out: &mut VecDeque<String>) -> Result<()> {
        self.buf.extend_from_slice(chunk);
        while let Some(newline) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=newline).collect();
            decode_line(as_utf8(&line)?.trim(), out)?;
        }
        Ok(())
    }

    // The last line of the body may not be newline-terminated.
    fn finish(&mut self, out: &mut VecDeque<String>) -> Result<()> {
        let line = std::mem::take(&mut self.buf);
        decode_line(as_utf8(&line)?.trim(), out)
    }
}

fn as_utf8(line: &[u8]) -> Result<&str> {
    std::str::from_utf8(line).context("Ollama stream contained invalid UTF-8")
}

fn decode_line(line: &str, out: &mut VecDeque<String>) -> Result<()> {
    if line.is_empty() {
        return Ok(());
    }
    let chunk: GenerateChunk = serde_json::from_str(line)
        .with_context(|| format!("Failed to decode Ollama stream line: {:.120}", line))?;
    if let Some(fragment) = chunk.response {
        out.push_back(fragment);
    }
    Ok(())
}

/// Start a streaming generation request. No explicit timeout: the request
/// blocks until the model finishes or the connection drops.
#[instrument(skip(client, config, prompt))]
pub async fn generate(client: &Client, config: &Config, prompt: &str) -> Result<FragmentStream> {
    let url = format!("{}/api/generate", config.ollama_base_url);

    let request_payload = GenerateRequest {
        model: config.model.clone(),
        prompt: prompt.to_string(),
        stream: true,
    };

    debug!(model = %request_payload.model, "Sending streaming generate request to Ollama");

    let response = client
        .post(&url)
        .json(&request_payload)
        .send()
        .await
        .with_context(|| format!("Failed to send generate request to Ollama at {}", url))?
        .error_for_status()
        .context("Ollama generate request failed")?;

    Ok(FragmentStream {
        body: response.bytes_stream().boxed(),
        decoder: LineDecoder::default(),
        pending: VecDeque::new(),
        done: false,
    })
}

/// Non-streaming variant: one JSON body, the full response text at once.
/// The session loop always streams; this is the `stream: false` side of the
/// protocol.
#[allow(dead_code)]
#[instrument(skip(client, config, prompt))]
pub async fn generate_once(client: &Client, config: &Config, prompt: &str) -> Result<String> {
    let url = format!("{}/api/generate", config.ollama_base_url);

    let request_payload = GenerateRequest {
        model: config.model.clone(),
        prompt: prompt.to_string(),
        stream: false,
    };

    debug!(model = %request_payload.model, "Sending generate request to Ollama");

    let response = client
        .post(&url)
        .json(&request_payload)
        .send()
        .await
        .with_context(|| format!("Failed to send generate request to Ollama at {}", url))?
        .error_for_status()
        .context("Ollama generate request failed")?;

    let body: GenerateChunk = response
        .json()
        .await
        .context("Failed to parse Ollama generate response")?;

    Ok(body.response.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> String {
        let mut decoder = LineDecoder::default();
        let mut out = VecDeque::new();
        for chunk in chunks {
            decoder.push(chunk, &mut out).unwrap();
        }
        decoder.finish(&mut out).unwrap();
        out.into_iter().collect()
    }

    #[test]
    fn fragments_concatenate_in_order() {
        let assembled = decode_all(&[
            b"{\"response\":\"Hel\"}\n{\"response\":\"lo\"}\n",
            b"{}\n{\"response\":\"!\"}\n",
        ]);
        assert_eq!(assembled, "Hello!");
    }

    #[test]
    fn lines_split_across_chunks_are_reassembled() {
        let assembled = decode_all(&[b"{\"respo", b"nse\":\"Hi\"}\n"]);
        assert_eq!(assembled, "Hi");
    }

    #[test]
    fn final_line_without_newline_is_decoded() {
        let assembled = decode_all(&[b"{\"response\":\"end\"}"]);
        assert_eq!(assembled, "end");
    }

    #[test]
    fn multibyte_char_split_across_chunks() {
        let assembled = decode_all(&[b"{\"response\":\"caf\xc3", b"\xa9\"}\n"]);
        assert_eq!(assembled, "caf\u{e9}");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let assembled = decode_all(&[b"\n\n{\"response\":\"x\"}\n\n"]);
        assert_eq!(assembled, "x");
    }

    #[test]
    fn malformed_line_is_an_error() {
        let mut decoder = LineDecoder::default();
        let mut out = VecDeque::new();
        assert!(decoder.push(b"not json\n", &mut out).is_err());
    }

    #[tokio::test]
    async fn probe_against_unreachable_server_is_false() {
        // Reserved TEST-NET-1 address; nothing listens there.
        let config = Config {
            ollama_base_url: "http://192.0.2.1:11434".to_string(),
            model: "gemma3:12b".to_string(),
        };
        let client = Client::new();
        assert!(!check_available(&client, &config).await);
    }
}
