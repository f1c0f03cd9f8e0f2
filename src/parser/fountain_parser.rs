use log::debug;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Element, ElementType, EmphasisStyle, ParseOptions, TextFormat, TitlePage};
use crate::utils::{ends_with_to, is_character_cue, looks_like_scene_heading, LINE_REGEX};

/// 解析结果: 标题页 + 正文元素序列
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutput {
    pub title_page: TitlePage,
    pub body: Vec<Element>,
}

/// 对话块上下文
///
/// 空行清除上下文，角色/插入语/对白各自推进它。
/// 对白续行规则只依赖这个枚举，不依赖散落的布尔量。
#[derive(Debug, Clone, Copy, PartialEq)]
enum SpeechContext {
    None,
    AfterCharacter,
    AfterParenthetical,
    AfterDialogue,
}

impl SpeechContext {
    fn in_speech(self) -> bool {
        self != SpeechContext::None
    }
}

/// 分类一行时可见的全部上下文
struct LineContext<'a> {
    /// 完全修剪后的行，所有判定在它上面进行
    line: &'a str,
    /// 按选项修剪后的行，Action/对白保留它作为文本
    preserved: &'a str,
    /// 下一原始行是否为空(文件尾视为空)
    next_line_blank: bool,
    speech: SpeechContext,
}

/// 一条分类结果
struct Classification {
    element_type: ElementType,
    text: String,
    is_centered: bool,
    scene_number: Option<String>,
    section_depth: usize,
}

impl Classification {
    fn simple(element_type: ElementType, text: impl Into<String>) -> Self {
        Classification {
            element_type,
            text: text.into(),
            is_centered: false,
            scene_number: None,
            section_depth: 0,
        }
    }
}

type RuleFn = fn(&LineContext) -> Option<Classification>;

struct ClassifyRule {
    name: &'static str,
    apply: RuleFn,
}

/// 分类规则表。顺序即优先级，第一个命中的规则生效。
/// 表尾的 DefaultToActionRule 无条件命中，保证每个非空行都有归属。
static CLASSIFY_RULES: &[ClassifyRule] = &[
    ClassifyRule { name: "SectionRule", apply: section_rule },
    ClassifyRule { name: "PageBreakRule", apply: page_break_rule },
    ClassifyRule { name: "SynopsisRule", apply: synopsis_rule },
    ClassifyRule { name: "ForcedHeadingRule", apply: forced_heading_rule },
    ClassifyRule { name: "SceneHeadingRule", apply: scene_heading_rule },
    ClassifyRule { name: "CenteredActionRule", apply: centered_action_rule },
    ClassifyRule { name: "ForcedTransitionRule", apply: forced_transition_rule },
    ClassifyRule { name: "TransitionRule", apply: transition_rule },
    ClassifyRule { name: "ForcedActionRule", apply: forced_action_rule },
    ClassifyRule { name: "LyricsRule", apply: lyrics_rule },
    ClassifyRule { name: "CharacterRule", apply: character_rule },
    ClassifyRule { name: "ParentheticalRule", apply: parenthetical_rule },
    ClassifyRule { name: "DialogueRule", apply: dialogue_rule },
    ClassifyRule { name: "DefaultToActionRule", apply: default_action_rule },
];

/// 规则名列表，顺序即优先级。测试用它断言优先级是数据而不是控制流。
pub fn rule_names() -> Vec<&'static str> {
    CLASSIFY_RULES.iter().map(|r| r.name).collect()
}

fn classify(ctx: &LineContext) -> (&'static str, Classification) {
    for rule in CLASSIFY_RULES {
        if let Some(c) = (rule.apply)(ctx) {
            return (rule.name, c);
        }
    }
    unreachable!("DefaultToActionRule 不会落空");
}

fn section_rule(ctx: &LineContext) -> Option<Classification> {
    let caps = LINE_REGEX["section"].captures(ctx.line)?;
    let mut c = Classification::simple(ElementType::Section, caps[2].trim());
    c.section_depth = caps[1].len();
    Some(c)
}

fn page_break_rule(ctx: &LineContext) -> Option<Classification> {
    if LINE_REGEX["page_break"].is_match(ctx.line) {
        Some(Classification::simple(ElementType::PageBreak, ""))
    } else {
        None
    }
}

fn synopsis_rule(ctx: &LineContext) -> Option<Classification> {
    let caps = LINE_REGEX["synopsis"].captures(ctx.line)?;
    Some(Classification::simple(ElementType::Synopsis, caps[1].trim()))
}

/// 行尾 #...# 拆出场景编号
fn split_scene_number(text: &str) -> (String, Option<String>) {
    let re = &LINE_REGEX["scene_number"];
    match re.captures(text) {
        Some(caps) => {
            let number = caps.get(1).unwrap().as_str().trim().to_string();
            let stripped = re.replace(text, "").trim().to_string();
            (stripped, Some(number))
        }
        None => (text.to_string(), None),
    }
}

fn forced_heading_rule(ctx: &LineContext) -> Option<Classification> {
    let rest = ctx.line.strip_prefix('.')?;
    // ".." 开头是省略号，不是强制标题
    if rest.starts_with('.') {
        return None;
    }
    let (text, number) = split_scene_number(rest.trim());
    let mut c = Classification::simple(ElementType::SceneHeading, text);
    c.scene_number = number;
    Some(c)
}

fn scene_heading_rule(ctx: &LineContext) -> Option<Classification> {
    if !looks_like_scene_heading(ctx.line) {
        return None;
    }
    let (text, number) = split_scene_number(ctx.line);
    let mut c = Classification::simple(ElementType::SceneHeading, text);
    c.scene_number = number;
    Some(c)
}

fn centered_action_rule(ctx: &LineContext) -> Option<Classification> {
    let caps = LINE_REGEX["centered"].captures(ctx.line)?;
    let mut c = Classification::simple(ElementType::Action, &caps[1]);
    c.is_centered = true;
    Some(c)
}

fn forced_transition_rule(ctx: &LineContext) -> Option<Classification> {
    // 居中规则在前，这里只剩没有尾部 < 的情况
    let caps = LINE_REGEX["transition_force"].captures(ctx.line)?;
    Some(Classification::simple(ElementType::Transition, caps[1].trim()))
}

fn transition_rule(ctx: &LineContext) -> Option<Classification> {
    if is_character_cue(ctx.line) && ends_with_to(ctx.line) {
        Some(Classification::simple(ElementType::Transition, ctx.line))
    } else {
        None
    }
}

fn forced_action_rule(ctx: &LineContext) -> Option<Classification> {
    let caps = LINE_REGEX["action_force"].captures(ctx.line)?;
    Some(Classification::simple(ElementType::Action, caps[1].trim()))
}

fn lyrics_rule(ctx: &LineContext) -> Option<Classification> {
    let caps = LINE_REGEX["lyric"].captures(ctx.line)?;
    Some(Classification::simple(ElementType::Lyrics, &caps[1]))
}

fn character_rule(ctx: &LineContext) -> Option<Classification> {
    // @ 强制角色，在对话块内也生效(新的提示行)
    if let Some(caps) = LINE_REGEX["character_force"].captures(ctx.line) {
        return Some(Classification::simple(ElementType::Character, caps[1].trim()));
    }
    // 启发式: 不在对话块内、无小写字母、且下一行紧跟着对白形状的内容。
    // 全大写短动作行的误判是已知并保留的行为。
    if !ctx.speech.in_speech() && is_character_cue(ctx.line) && !ctx.next_line_blank {
        return Some(Classification::simple(ElementType::Character, ctx.line));
    }
    None
}

fn parenthetical_rule(ctx: &LineContext) -> Option<Classification> {
    // 只在对话块内生效，否则退化为 Action
    if ctx.speech.in_speech() && ctx.line.starts_with('(') && ctx.line.ends_with(')') {
        Some(Classification::simple(ElementType::Parenthetical, ctx.line))
    } else {
        None
    }
}

fn dialogue_rule(ctx: &LineContext) -> Option<Classification> {
    if ctx.speech.in_speech() {
        Some(Classification::simple(ElementType::Dialogue, ctx.preserved))
    } else {
        None
    }
}

fn default_action_rule(ctx: &LineContext) -> Option<Classification> {
    Some(Classification::simple(ElementType::Action, ctx.preserved))
}

/// 把 [[...]] 注解从行内拆出来
fn extract_notes(line: &str) -> (String, Vec<String>) {
    let re = &LINE_REGEX["note_inline"];
    let notes: Vec<String> = re
        .captures_iter(line)
        .map(|c| c.get(1).unwrap().as_str().trim().to_string())
        .collect();
    if notes.is_empty() {
        (line.to_string(), notes)
    } else {
        (re.replace_all(line, "").to_string(), notes)
    }
}

/// Fountain 格式解析器
///
/// 每个实例自持有输出缓冲，一次 parse 调用在调用线程上跑完，
/// 多个实例可以并行使用。
pub struct FountainParser {
    options: ParseOptions,
}

impl Default for FountainParser {
    fn default() -> Self {
        FountainParser::new()
    }
}

impl FountainParser {
    pub fn new() -> Self {
        FountainParser::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        FountainParser { options }
    }

    /// 解析 Fountain 文本
    ///
    /// 不会失败: 无法归类的行落到 Action，空输入产生空结果。
    pub fn parse(&self, script: &str) -> ParseOutput {
        let mut result = ParseOutput::default();
        if script.is_empty() {
            return result;
        }

        // 统一换行符
        let normalized = script.replace("\r\n", "\n").replace('\r', "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();

        // 标题页阶段，结束后进入正文阶段不再回头
        let (title_page, body_start) = self.parse_title_page(&lines);
        result.title_page = title_page;

        let mut speech = SpeechContext::None;
        let mut blank_before = true;
        // (元素, 它前面是否隔着空行)，合并阶段要用第二个信息
        let mut staged: Vec<(Element, bool)> = Vec::new();

        let mut i = body_start;
        while i < lines.len() {
            let raw = lines[i];
            i += 1;

            // 显式硬换行: 行尾空白保留时，纯空白行(两个字符以上)是 LineBreak
            if !self.options.ignore_trailing_whitespace && LINE_REGEX["line_break"].is_match(raw) {
                staged.push((Element::new(ElementType::LineBreak, ""), blank_before));
                blank_before = false;
                continue;
            }

            if raw.trim().is_empty() {
                // 空行本身不产生元素，但作为分隔信息保留
                blank_before = true;
                speech = SpeechContext::None;
                continue;
            }

            let mut preserved: &str = raw;
            if self.options.ignore_leading_whitespace {
                preserved = preserved.trim_start();
            }
            if self.options.ignore_trailing_whitespace {
                preserved = preserved.trim_end();
            }

            // 注解先于分类提取，保证 [[...]] 不影响标题/角色判定
            let (mut clean, notes) = extract_notes(preserved);
            if !notes.is_empty() {
                if self.options.ignore_leading_whitespace {
                    clean = clean.trim_start().to_string();
                }
                if self.options.ignore_trailing_whitespace {
                    clean = clean.trim_end().to_string();
                }
            }

            if clean.trim().is_empty() {
                // 整行只有注解: 挂到前一个元素；开头的孤立注解留在一个空 Action 上
                if let Some((prev, _)) = staged.last_mut() {
                    prev.notes.extend(notes);
                } else {
                    let mut el = Element::new(ElementType::Action, "");
                    el.notes = notes;
                    staged.push((el, blank_before));
                }
                blank_before = false;
                continue;
            }

            let next_line_blank = lines
                .get(i)
                .map(|l| l.trim().is_empty())
                .unwrap_or(true);
            let ctx = LineContext {
                line: clean.trim(),
                preserved: &clean,
                next_line_blank,
                speech,
            };
            let (rule_name, cls) = classify(&ctx);
            debug!("行 {} 由 {} 判定为 {:?}", i, rule_name, cls.element_type);

            speech = match cls.element_type {
                ElementType::Character => SpeechContext::AfterCharacter,
                ElementType::Parenthetical => SpeechContext::AfterParenthetical,
                ElementType::Dialogue => SpeechContext::AfterDialogue,
                // 对话块内的歌词不断开后续对白
                ElementType::Lyrics if speech.in_speech() => SpeechContext::AfterDialogue,
                _ => SpeechContext::None,
            };

            let mut el = Element::new(cls.element_type, cls.text);
            el.is_centered = cls.is_centered;
            el.scene_number = cls.scene_number;
            el.section_depth = cls.section_depth;
            el.notes = notes;
            staged.push((el, blank_before));
            blank_before = false;
        }

        let mut body = if self.options.join_adjacent_elements {
            join_adjacent(staged)
        } else {
            staged.into_iter().map(|(el, _)| el).collect()
        };

        if self.options.resolve_emphasis {
            for el in &mut body {
                let (text, formats) = resolve_emphasis(&el.text);
                el.text = text;
                el.formats = formats;
            }
        }

        result.body = body;
        result
    }

    /// 标题页阶段
    ///
    /// 返回标题页和正文起始行号。只有文件第一个非空行是 Key: Value
    /// 形式时才存在标题页；缩进行续接上一个条目的值；空行之后若不再是
    /// 条目(或出现场景标题形状的行)则标题页结束。
    fn parse_title_page(&self, lines: &[&str]) -> (TitlePage, usize) {
        let mut tp = TitlePage::new();
        let mut current: Option<(String, Vec<String>)> = None;

        fn flush(tp: &mut TitlePage, current: &mut Option<(String, Vec<String>)>) {
            if let Some((key, values)) = current.take() {
                tp.push(key, values.join("\n"));
            }
        }

        // 某行是否是 Key: Value 条目；require_known 时关键字还得在词汇表里
        fn is_entry(line: &str, require_known: bool) -> bool {
            if looks_like_scene_heading(line) {
                return false;
            }
            match LINE_REGEX["title_page_entry"].captures(line) {
                Some(caps) => !require_known || TitlePage::is_known_key(&caps[1]),
                None => false,
            }
        }

        let mut i = 0;
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
        if i >= lines.len() {
            return (tp, i);
        }
        // 标题页必须以已知关键字开头，否则 "FADE IN:" 这类行会被误收。
        // 进入标题页之后，紧连的条目接受任意关键字。
        if !is_entry(lines[i].trim(), true) {
            return (tp, 0);
        }

        while i < lines.len() {
            let raw = lines[i];
            let line = raw.trim();

            if line.is_empty() {
                // 空行后面还是条目则继续，否则正文从空行后开始
                let mut j = i + 1;
                while j < lines.len() && lines[j].trim().is_empty() {
                    j += 1;
                }
                // 空行之后只有已知关键字的条目才算标题页的延续，
                // 避免把正文里的 "FADE IN:" 之类吃进来
                let continues = j < lines.len() && is_entry(lines[j].trim(), true);
                if continues {
                    i = j;
                    continue;
                }
                flush(&mut tp, &mut current);
                return (tp, j);
            }

            if looks_like_scene_heading(line) {
                flush(&mut tp, &mut current);
                return (tp, i);
            }

            let indented = raw.starts_with(' ') || raw.starts_with('\t');
            if indented && current.is_some() {
                if let Some((_, values)) = &mut current {
                    values.push(line.to_string());
                }
                i += 1;
                continue;
            }

            match LINE_REGEX["title_page_entry"].captures(line) {
                Some(caps) => {
                    flush(&mut tp, &mut current);
                    let value = caps[2].trim().to_string();
                    let values = if value.is_empty() { Vec::new() } else { vec![value] };
                    current = Some((caps[1].trim().to_string(), values));
                    i += 1;
                }
                None => {
                    // 不是条目也不是续行: 标题页到此为止
                    flush(&mut tp, &mut current);
                    return (tp, i);
                }
            }
        }

        flush(&mut tp, &mut current);
        (tp, lines.len())
    }
}

/// 合并相邻同类元素(中间无空行)，文本换行拼接
fn join_adjacent(staged: Vec<(Element, bool)>) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::with_capacity(staged.len());
    for (el, blank_before) in staged {
        let joinable = matches!(
            el.element_type,
            ElementType::Action | ElementType::Dialogue | ElementType::Lyrics
        );
        if !blank_before && joinable {
            if let Some(prev) = out.last_mut() {
                if prev.element_type == el.element_type && prev.is_centered == el.is_centered {
                    if !prev.text.is_empty() || !el.text.is_empty() {
                        if !prev.text.is_empty() {
                            prev.text.push('\n');
                        }
                        prev.text.push_str(&el.text);
                    }
                    prev.notes.extend(el.notes);
                    continue;
                }
            }
        }
        out.push(el);
    }
    out
}

/// 强调标记种类，按配对优先级排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    BoldItalic,
    Bold,
    Italic,
    Underline,
}

impl MarkerKind {
    fn literal(self) -> &'static str {
        match self {
            MarkerKind::BoldItalic => "***",
            MarkerKind::Bold => "**",
            MarkerKind::Italic => "*",
            MarkerKind::Underline => "_",
        }
    }
}

enum Tok {
    Text(String),
    Marker { kind: MarkerKind, consumed: bool },
}

fn push_text(toks: &mut Vec<Tok>, piece: &str) {
    if let Some(Tok::Text(s)) = toks.last_mut() {
        s.push_str(piece);
    } else {
        toks.push(Tok::Text(piece.to_string()));
    }
}

/// 解析强调标记
///
/// 返回去掉标记的文本和格式区间(字素簇下标的半开区间)。
/// 逐样式就近配对，复合样式(***)先于单一样式；配不上对的标记保留为
/// 字面字符；\* 和 \_ 是转义。*** 产出同区间的 Bold + Italic 两条。
pub fn resolve_emphasis(text: &str) -> (String, Vec<TextFormat>) {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    let mut toks: Vec<Tok> = Vec::new();

    let mut i = 0;
    while i < graphemes.len() {
        let g = graphemes[i];
        if g == "\\" && i + 1 < graphemes.len() && (graphemes[i + 1] == "*" || graphemes[i + 1] == "_") {
            push_text(&mut toks, graphemes[i + 1]);
            i += 2;
            continue;
        }
        if g == "*" {
            let mut n = 0;
            while i + n < graphemes.len() && graphemes[i + n] == "*" {
                n += 1;
            }
            i += n;
            // 与逐级替换保持一致: 先吃掉三连，剩余按双/单处理
            while n > 0 {
                if n >= 3 {
                    toks.push(Tok::Marker { kind: MarkerKind::BoldItalic, consumed: false });
                    n -= 3;
                } else if n == 2 {
                    toks.push(Tok::Marker { kind: MarkerKind::Bold, consumed: false });
                    n = 0;
                } else {
                    toks.push(Tok::Marker { kind: MarkerKind::Italic, consumed: false });
                    n = 0;
                }
            }
            continue;
        }
        if g == "_" {
            toks.push(Tok::Marker { kind: MarkerKind::Underline, consumed: false });
            i += 1;
            continue;
        }
        push_text(&mut toks, g);
        i += 1;
    }

    // 逐样式配对
    let mut pairs: Vec<(usize, usize, MarkerKind)> = Vec::new();
    for kind in [
        MarkerKind::BoldItalic,
        MarkerKind::Bold,
        MarkerKind::Italic,
        MarkerKind::Underline,
    ] {
        let mut open: Option<usize> = None;
        for idx in 0..toks.len() {
            let is_open_candidate = matches!(
                toks[idx],
                Tok::Marker { kind: k, consumed: false } if k == kind
            );
            if !is_open_candidate {
                continue;
            }
            match open {
                None => open = Some(idx),
                Some(o) => {
                    let has_content = toks[o + 1..idx].iter().any(|t| match t {
                        Tok::Text(s) => !s.is_empty(),
                        Tok::Marker { .. } => true,
                    });
                    if has_content {
                        if let Tok::Marker { consumed, .. } = &mut toks[o] {
                            *consumed = true;
                        }
                        if let Tok::Marker { consumed, .. } = &mut toks[idx] {
                            *consumed = true;
                        }
                        pairs.push((o, idx, kind));
                        open = None;
                    } else {
                        // 空配对放弃，当前标记作为新的开口
                        open = Some(idx);
                    }
                }
            }
        }
    }

    // 生成最终文本并记录每个 token 的字素位置
    let mut out = String::new();
    let mut pos = 0usize;
    let mut tok_pos: Vec<usize> = Vec::with_capacity(toks.len());
    for tok in &toks {
        tok_pos.push(pos);
        match tok {
            Tok::Text(s) => {
                out.push_str(s);
                pos += s.graphemes(true).count();
            }
            Tok::Marker { consumed: true, .. } => {}
            Tok::Marker { kind, consumed: false } => {
                let lit = kind.literal();
                out.push_str(lit);
                pos += lit.len();
            }
        }
    }

    let mut formats = Vec::new();
    for (o, c, kind) in pairs {
        let (start, end) = (tok_pos[o], tok_pos[c]);
        if start >= end {
            continue;
        }
        match kind {
            MarkerKind::BoldItalic => {
                formats.push(TextFormat::new(start, end, EmphasisStyle::Bold));
                formats.push(TextFormat::new(start, end, EmphasisStyle::Italic));
            }
            MarkerKind::Bold => formats.push(TextFormat::new(start, end, EmphasisStyle::Bold)),
            MarkerKind::Italic => formats.push(TextFormat::new(start, end, EmphasisStyle::Italic)),
            MarkerKind::Underline => {
                formats.push(TextFormat::new(start, end, EmphasisStyle::Underline))
            }
        }
    }
    formats.sort_by_key(|f| (f.start, f.end, style_rank(f.style)));
    (out, formats)
}

fn style_rank(style: EmphasisStyle) -> u8 {
    match style {
        EmphasisStyle::Bold => 0,
        EmphasisStyle::Italic => 1,
        EmphasisStyle::Underline => 2,
    }
}
