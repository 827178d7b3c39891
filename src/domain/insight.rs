//! Insight 生成器
//!
//! 根据壁纸标题和标签生成一段简短的描述文本。纯模板逻辑，相同输入总是得到相同输出

/// 标签关键词 -> 氛围
const MOOD_VOCABULARY: &[(&str, &str)] = &[
    ("cyberpunk", "electric"),
    ("neon", "electric"),
    ("city", "urban"),
    ("space", "cosmic"),
    ("galaxy", "cosmic"),
    ("star", "cosmic"),
    ("ocean", "calming"),
    ("sea", "calming"),
    ("beach", "calming"),
    ("forest", "serene"),
    ("nature", "serene"),
    ("mountain", "majestic"),
    ("sunset", "warm"),
    ("autumn", "warm"),
    ("dark", "moody"),
    ("night", "moody"),
    ("rain", "moody"),
    ("minimal", "minimalist"),
    ("abstract", "expressive"),
    ("art", "expressive"),
    ("anime", "vibrant"),
    ("car", "dynamic"),
];

/// 没有匹配到任何标签时的氛围
pub const FALLBACK_MOOD: &str = "timeless";

/// 标题为空时的称呼
const UNTITLED: &str = "This wallpaper";

const TEMPLATES: &[&str] = &[
    "{title} brings a {mood} energy to your screen.",
    "A {mood} composition, {title} rewards a second look.",
    "With its {mood} atmosphere, {title} turns any desktop into a statement.",
    "{title} captures a {mood} moment worth keeping in view.",
];

/// 从标签中挑选氛围词（第一个命中词表的标签生效）
pub fn pick_mood<S: AsRef<str>>(tags: &[S]) -> &'static str {
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if let Some((_, mood)) = MOOD_VOCABULARY
            .iter()
            .find(|(keyword, _)| tag.contains(keyword))
        {
            return mood;
        }
    }
    FALLBACK_MOOD
}

/// 标题的稳定散列，用于选择模板
#[inline]
fn stable_index(title: &str, modulo: usize) -> usize {
    let hash = title
        .chars()
        .fold(0u32, |acc, ch| acc.wrapping_mul(31).wrapping_add(ch as u32));
    hash as usize % modulo
}

/// 生成壁纸 insight
pub fn generate_insight<S: AsRef<str>>(title: &str, tags: &[S]) -> String {
    let title = title.trim();
    let subject = if title.is_empty() { UNTITLED } else { title };
    let mood = pick_mood(tags);

    let template = TEMPLATES[stable_index(subject, TEMPLATES.len())];
    let mut insight = template.replace("{mood}", mood).replace("{title}", subject);

    // 标题以小写字母开头时句首大写
    if let Some(first) = insight.chars().next() {
        if first.is_lowercase() {
            insight = first.to_uppercase().collect::<String>() + &insight[first.len_utf8()..];
        }
    }

    let named: Vec<&str> = tags
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .take(2)
        .collect();
    match named.as_slice() {
        [] => {}
        [one] => insight.push_str(&format!(" Perfect for fans of {}.", one)),
        [a, b, ..] => insight.push_str(&format!(" Perfect for fans of {} and {}.", a, b)),
    }

    insight
}
