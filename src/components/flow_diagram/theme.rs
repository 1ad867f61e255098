/// Palette threaded through every renderer. Colors are CSS color strings.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	pub background: String,
	pub grid_dot: String,
	/// Minimap glyph color for nodes that declare none; also the default edge color.
	pub accent: String,
	pub text: String,
	pub text_muted: String,
	pub card_body: String,
	pub card_border: String,
	pub card_color: String,
	pub decision_color: String,
	pub database_color: String,
	pub handle: String,
	/// Text drawn on a node or flow color: card headers, active flow buttons.
	pub header_text: String,
	/// Outline of inactive flow buttons and fill of flows without a color.
	pub neutral: String,
	pub label_pill: String,
	pub minimap_background: String,
	pub minimap_mask: String,
	pub font_family: String,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: "#0f172a".into(),
			grid_dot: "#334155".into(),
			accent: "#38bdf8".into(),
			text: "#e2e8f0".into(),
			text_muted: "#94a3b8".into(),
			card_body: "#1e293b".into(),
			card_border: "#334155".into(),
			card_color: "#6366f1".into(),
			decision_color: "#f59e0b".into(),
			database_color: "#10b981".into(),
			handle: "#64748b".into(),
			header_text: "#ffffff".into(),
			neutral: "#64748b".into(),
			label_pill: "#0f172a".into(),
			minimap_background: "#111827".into(),
			minimap_mask: "rgba(15, 23, 42, 0.7)".into(),
			font_family: "Inter, system-ui, sans-serif".into(),
		}
	}
}

impl Theme {
	pub fn font(&self, weight: u16, size: f64) -> String {
		format!("{weight} {size}px {}", self.font_family)
	}
}

/// `#rrggbb` (or `#rgb`) as `rgba(r, g, b, alpha)`. Anything else is returned
/// unchanged, so named colors still draw, just without translucency.
pub fn with_alpha(color: &str, alpha: f64) -> String {
	let Some(hex) = color.strip_prefix('#').filter(|h| h.is_ascii()) else {
		return color.to_string();
	};
	let expanded: String = match hex.len() {
		3 => hex.chars().flat_map(|c| [c, c]).collect(),
		6 => hex.to_string(),
		_ => return color.to_string(),
	};
	let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16);
	match (channel(0), channel(2), channel(4)) {
		(Ok(r), Ok(g), Ok(b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
		_ => color.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_colors_gain_alpha() {
		assert_eq!(with_alpha("#ff8000", 0.5), "rgba(255, 128, 0, 0.5)");
		assert_eq!(with_alpha("#fff", 0.25), "rgba(255, 255, 255, 0.25)");
	}

	#[test]
	fn other_colors_pass_through() {
		assert_eq!(with_alpha("tomato", 0.5), "tomato");
		assert_eq!(with_alpha("#zzzzzz", 0.5), "#zzzzzz");
		assert_eq!(with_alpha("#12345", 0.5), "#12345");
	}
}
