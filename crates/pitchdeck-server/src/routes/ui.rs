//! HTML for the three views.
//!
//! Projects a [`Page`] into server-rendered HTML with inline CSS. Every
//! action is a plain form post, so the site works without JavaScript; the
//! one inline script only swaps the submit button label while the kit is
//! being generated.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};

use pitchdeck_core::pitch::{PitchForm, Tone};
use pitchdeck_core::render::{Page, ToolStatus};

const PAGE_TITLE: &str = "PR Pitch Deck | Get Press Ready";

/// Render a page description to HTML.
#[must_use]
pub fn page(page: &Page) -> Markup {
    match page {
        Page::Landing { checkout_url } => landing(checkout_url),
        Page::Login { error } => login(error.as_deref()),
        Page::Tool {
            form,
            tones,
            notice,
            status,
        } => tool(form, tones, notice.as_deref(), status),
    }
}

fn layout(title: &str, body: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { (title) }
                style { (PreEscaped(APP_CSS)) }
            }
            body {
                main class="container" { (body) }
            }
        }
    }
}

// ── Landing ──────────────────────────────────────────────────────────

fn landing(checkout_url: &str) -> Markup {
    let body = html! {
        section class="hero" {
            h1 { "🚀 Get Press Coverage. Zero Effort." }
            p class="lead" { "Generate journalist-ready Press Releases & Cold Pitches in 30 seconds." }
        }
        hr;
        div class="columns" {
            div class="card" {
                h3 { "❌ The Old Way:" }
                ul {
                    li { "Hire a PR agency ($2,000+)" }
                    li { "Struggle to write a press release" }
                    li { "Get ignored by journalists" }
                }
            }
            div class="card" {
                h3 { "✅ The PR Pitch Deck Way:" }
                ul {
                    li { "Enter your product details" }
                    li { strong { "AI generates the perfect angle" } }
                    li { "Get a Press Release + Cold Email instantly" }
                }
            }
        }
        hr;
        h4 { "💡 Stop launching in silence. Get the attention you deserve." }
        div class="alert alert-info" {
            "🔥 " strong { "Launch Special:" } " Lifetime Access for just " strong { "$9" }
        }
        div class="actions" {
            a class="btn btn-primary" href=(checkout_url) rel="noopener noreferrer" {
                "👉 Get Instant Access"
            }
            form method="post" action="/navigate" {
                input type="hidden" name="view" value="login";
                button class="btn btn-outline" type="submit" { "🔑 Already have a code? Login" }
            }
        }
        hr;
        p class="caption" { "Trusted by Indie Hackers & Solopreneurs. Powered by Gemini AI." }
    };
    layout(PAGE_TITLE, &body)
}

// ── Login ────────────────────────────────────────────────────────────

fn login(error: Option<&str>) -> Markup {
    let body = html! {
        h1 { "🔐 Member Login" }
        p { "Enter the Access Code sent to your email after purchase." }
        @if let Some(error) = error {
            div class="alert alert-error" role="alert" { "❌ " (error) }
        }
        form method="post" action="/login" class="stack" {
            label for="code" { "Enter Access Code" }
            input id="code" name="code" type="password" autocomplete="current-password" required autofocus;
            div class="actions" {
                button class="btn btn-primary" type="submit" { "Login" }
                button class="btn btn-outline" type="submit" formaction="/navigate"
                    name="view" value="landing" formnovalidate { "← Back to Home" }
            }
        }
    };
    layout("Member Login | PR Pitch Deck", &body)
}

// ── Tool ─────────────────────────────────────────────────────────────

fn tool(form: &PitchForm, tones: &[Tone], notice: Option<&str>, status: &ToolStatus) -> Markup {
    let selected = form.tone.parse::<Tone>().unwrap_or_default();
    let body = html! {
        div class="topbar" {
            span { "Logged in." }
            form method="post" action="/logout" {
                button class="btn btn-small btn-outline" type="submit" { "Log out" }
            }
        }
        h1 { "⚡ PR Pitch Generator" }
        p { "Fill in the details below to generate your Media Kit." }
        @if let Some(notice) = notice {
            div class="alert alert-warn" role="alert" { (notice) }
        }
        form id="pr-form" method="post" action="/generate" class="stack card" {
            label for="product_name" { "Product Name" }
            input id="product_name" name="product_name" type="text"
                placeholder="e.g. SupaTask" value=(form.product_name) required;

            label for="target_audience" { "Target Audience" }
            input id="target_audience" name="target_audience" type="text"
                placeholder="e.g. Remote Project Managers" value=(form.target_audience);

            label for="key_features" { "Key Features (Bullet points)" }
            textarea id="key_features" name="key_features" rows="5"
                placeholder="- AI auto-scheduling\n- Slack integration\n- Dark mode" required {
                (form.key_features)
            }

            label for="tone" { "Tone" }
            select id="tone" name="tone" {
                @for tone in tones {
                    option value=(tone.label()) selected[*tone == selected] { (tone.label()) }
                }
            }

            button id="generate" class="btn btn-primary" type="submit" { "Generate PR Kit 🚀" }
        }
        (status_block(status))
        script { (PreEscaped(SUBMIT_SCRIPT)) }
    };
    layout("PR Pitch Generator | PR Pitch Deck", &body)
}

fn status_block(status: &ToolStatus) -> Markup {
    match status {
        ToolStatus::Idle => html! {},
        ToolStatus::Generating => html! {
            div class="alert alert-info" { "Consulting the PR Gods..." }
        },
        ToolStatus::Done { kit } => html! {
            div class="alert alert-success" { "Boom! Here is your kit." }
            hr;
            article class="kit" { (markdown(kit)) }
            details {
                summary { "Raw text" }
                pre class="raw" { (kit) }
            }
        },
        ToolStatus::Failed { message } => html! {
            div class="alert alert-error" role="alert" { "Error: " (message) }
        },
    }
}

/// Render model output as Markdown.
///
/// Markdown formatting is kept; raw HTML blocks in the text are shown as
/// literal text rather than injected into the page. Link and image targets
/// with a scheme other than `http`, `https` or `mailto` are replaced by `#`.
#[must_use]
pub fn markdown(text: &str) -> PreEscaped<String> {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: safe_url(dest_url),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: safe_url(dest_url),
                title,
                id,
            }),
            other => other,
        });

    let mut out = String::with_capacity(text.len().saturating_mul(2));
    pulldown_cmark::html::push_html(&mut out, parser);
    PreEscaped(out)
}

fn safe_url(dest: CowStr<'_>) -> CowStr<'_> {
    if has_allowed_scheme(&dest) {
        dest
    } else {
        CowStr::Borrowed("#")
    }
}

/// Relative targets have no scheme and are allowed.
fn has_allowed_scheme(dest: &str) -> bool {
    let dest = dest.trim();
    let scheme_end = dest.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(i) if dest[i..].starts_with(':') => {
            let scheme = dest[..i].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}

/// Disables the submit button and shows progress while the kit is generated.
const SUBMIT_SCRIPT: &str = r"
document.getElementById('pr-form').addEventListener('submit',function(){
  var b=document.getElementById('generate');b.disabled=true;b.textContent='Consulting the PR Gods...';
});
";

/// Stylesheet shared by every view.
const APP_CSS: &str = r"
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{--bg:#FFFDF7;--text:#2D1F0E;--muted:#7A6543;--primary:#E8A817;--border:rgba(45,31,14,.12);--font:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif}
body{font-family:var(--font);background:var(--bg);color:var(--text);line-height:1.6;-webkit-font-smoothing:antialiased}
.container{max-width:760px;margin:0 auto;padding:48px 24px}
h1{font-size:36px;font-weight:800;letter-spacing:-1px;margin-bottom:12px}
h3{font-size:17px;margin-bottom:8px}
h4{font-size:16px;margin:8px 0 16px}
hr{border:none;border-top:1px solid var(--border);margin:28px 0}
.lead{font-size:18px;color:var(--muted)}
.caption{font-size:13px;color:var(--muted)}
.columns{display:grid;grid-template-columns:1fr 1fr;gap:18px}
.card{border:1px solid var(--border);border-radius:16px;padding:24px;background:#fff}
.card ul{padding-left:20px}
.actions{display:flex;gap:12px;flex-wrap:wrap;margin-top:16px}
.btn{display:inline-flex;align-items:center;justify-content:center;padding:12px 24px;border-radius:50px;font-size:14px;font-weight:700;font-family:var(--font);border:none;cursor:pointer;text-decoration:none}
.btn-primary{background:linear-gradient(135deg,#F5C842,#E8A817);color:#2D1F0E}
.btn-primary:disabled{opacity:.6;cursor:wait}
.btn-outline{background:transparent;color:var(--text);border:1.5px solid var(--border)}
.btn-small{padding:6px 14px;font-size:13px}
.stack{display:flex;flex-direction:column;gap:8px}
.stack label{font-weight:600;font-size:14px;margin-top:8px}
input,textarea,select{font:inherit;padding:10px 12px;border:1px solid var(--border);border-radius:10px;background:#fff;color:var(--text)}
.topbar{display:flex;justify-content:space-between;align-items:center;font-size:13px;color:var(--muted);margin-bottom:24px}
.alert{border-radius:12px;padding:12px 16px;margin:16px 0;font-size:14px}
.alert-info{background:rgba(245,200,66,.15)}
.alert-success{background:rgba(46,160,67,.12)}
.alert-warn{background:rgba(232,168,23,.18)}
.alert-error{background:rgba(218,54,51,.12);color:#8B1A17}
.kit h1,.kit h2,.kit h3{margin:20px 0 8px}
.kit p,.kit ul,.kit ol{margin-bottom:12px}
.kit ul,.kit ol{padding-left:22px}
details{margin-top:24px}
pre.raw{white-space:pre-wrap;font-size:13px;background:#fff;border:1px solid var(--border);border-radius:10px;padding:16px;margin-top:8px}
@media(max-width:640px){.columns{grid-template-columns:1fr}h1{font-size:28px}}
";
