//! Substring scans for generative-AI tool names.
//!
//! Matching is case-insensitive and purely lexical: a hit means the tool's
//! name appears somewhere in the metadata, nothing more.

/// Marker → label for the serialized manifest store.
const CREDENTIAL_MARKERS: &[(&str, &str)] = &[
    ("firefly", "C2PA: Adobe Firefly"),
    ("dall-e", "C2PA: DALL-E"),
    ("midjourney", "C2PA: Midjourney"),
    ("veo", "C2PA: Veo (Google)"),
    ("synthetic", "C2PA: Synthetic Content Identified"),
];

/// Marker → tool name for single EXIF values.
const EXIF_MARKERS: &[(&str, &str)] = &[
    ("midjourney", "Midjourney"),
    ("stable diffusion", "Stable Diffusion"),
    ("comfyui", "ComfyUI"),
    ("veo", "Veo"),
];

/// Labels for every marker found in a serialized manifest store.
pub fn scan_credentials(manifest_json: &str) -> Vec<String> {
    let haystack = manifest_json.to_lowercase();
    CREDENTIAL_MARKERS
        .iter()
        .filter(|(marker, _)| haystack.contains(marker))
        .map(|(_, label)| label.to_string())
        .collect()
}

/// `EXIF <tag>: <tool>` for every marker found in one field's value.
pub fn scan_exif(tag: &str, value: &str) -> Vec<String> {
    let haystack = value.to_lowercase();
    EXIF_MARKERS
        .iter()
        .filter(|(marker, _)| haystack.contains(marker))
        .map(|(_, tool)| format!("EXIF {tag}: {tool}"))
        .collect()
}
