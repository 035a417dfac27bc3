use crate::err::Error;
use crate::path::part::{Part, Path};

/// Tokenise a dotted path string with bracketed indices into a [`Path`].
///
/// Grammar (informal):
///   path   := segment ('.' segment | bracket)*
///   segment:= ident | bracket
///   bracket:= '[' (number | 'first' | 'last' | '*' | ':' | range) ']'
///   range  := bound? ':' bound?        -- bound := number | '$' | 'last'
///
/// `*` and a bare `:` (no bounds either side) are kept synonymous per the
/// design's open question: both produce [`Part::Wildcard`].
pub fn parse(path: &str) -> Result<Path, Error> {
	let mut parts = Vec::new();
	let bytes = path.as_bytes();
	let mut i = 0;
	let mut cur = String::new();

	let flush = |cur: &mut String, parts: &mut Path| {
		if !cur.is_empty() {
			parts.push(Part::Name(std::mem::take(cur)));
		}
	};

	while i < bytes.len() {
		match bytes[i] as char {
			'.' => {
				flush(&mut cur, &mut parts);
				i += 1;
			}
			'[' => {
				flush(&mut cur, &mut parts);
				let close = path[i..]
					.find(']')
					.map(|p| p + i)
					.ok_or_else(|| Error::InvalidPath(format!("unterminated '[' in '{path}'")))?;
				let inner = &path[i + 1..close];
				parts.push(parse_bracket(inner)?);
				i = close + 1;
			}
			c => {
				cur.push(c);
				i += 1;
			}
		}
	}
	flush(&mut cur, &mut parts);
	Ok(parts)
}

fn parse_bracket(inner: &str) -> Result<Part, Error> {
	let inner = inner.trim();
	if inner == "*" || inner == ":" {
		return Ok(Part::Wildcard);
	}
	if inner.eq_ignore_ascii_case("first") {
		return Ok(Part::First);
	}
	if inner.eq_ignore_ascii_case("last") {
		return Ok(Part::Last);
	}
	if let Some((l, r)) = inner.split_once(':') {
		let start = parse_bound(l.trim(), 0)?;
		let end = parse_bound(r.trim(), usize::MAX)?;
		return Ok(Part::Slice {
			start,
			end,
		});
	}
	if let Ok(n) = inner.parse::<usize>() {
		return Ok(Part::Index(n));
	}
	// A bare quoted or bare-word key inside brackets, e.g. ['my key']
	let unquoted = inner.trim_matches(|c| c == '\'' || c == '"');
	Ok(Part::Name(unquoted.to_owned()))
}

fn parse_bound(s: &str, default: usize) -> Result<usize, Error> {
	if s.is_empty() {
		return Ok(default);
	}
	if s == "$" || s.eq_ignore_ascii_case("last") {
		return Ok(usize::MAX);
	}
	s.parse::<usize>().map_err(|_| Error::InvalidPath(format!("invalid slice bound '{s}'")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn simple_dotted() {
		assert_eq!(parse("a.b.c").unwrap(), vec![Part::Name("a".into()), Part::Name("b".into()), Part::Name("c".into())]);
	}

	#[test]
	fn index_and_wildcard() {
		assert_eq!(
			parse("tags[0]").unwrap(),
			vec![Part::Name("tags".into()), Part::Index(0)]
		);
		assert_eq!(parse("tags[*]").unwrap(), vec![Part::Name("tags".into()), Part::Wildcard]);
		assert_eq!(parse("tags[:]").unwrap(), vec![Part::Name("tags".into()), Part::Wildcard]);
	}

	#[test]
	fn first_last() {
		assert_eq!(parse("tags[first]").unwrap(), vec![Part::Name("tags".into()), Part::First]);
		assert_eq!(parse("tags[last]").unwrap(), vec![Part::Name("tags".into()), Part::Last]);
	}

	#[test]
	fn slice() {
		assert_eq!(
			parse("tags[1:3]").unwrap(),
			vec![Part::Name("tags".into()), Part::Slice {
				start: 1,
				end: 3
			}]
		);
		assert_eq!(
			parse("tags[1:$]").unwrap(),
			vec![Part::Name("tags".into()), Part::Slice {
				start: 1,
				end: usize::MAX
			}]
		);
	}
}
