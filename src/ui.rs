use crate::models::{
    Activity, DashboardResponse, Employee, Identity, LibraryHabit, Mood, MoodImage, MoodLogEntry,
    Role,
};
use crate::preferences::{AdminSettings, Theme};
use crate::state::{Notice, NoticeLevel};
use crate::suggestions::{Suggestion, suggestions_for};
use std::fmt::Write;

pub struct IndexPage<'a> {
    pub identity: &'a Identity,
    pub date: &'a str,
    pub selected: Option<Mood>,
    pub context: &'a str,
    pub last_suggestion: Option<&'a Suggestion>,
    pub highlighted: bool,
    pub entries: &'a [MoodLogEntry],
}

pub struct AdminPage<'a> {
    pub identity: &'a Identity,
    pub dashboard: &'a DashboardResponse,
    pub employees: &'a [Employee],
    pub library: &'a [LibraryHabit],
    pub images: &'a [MoodImage],
    pub activity: &'a [Activity],
    pub settings: &'a AdminSettings,
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, theme: Theme, identity: Option<&Identity>, notice: Option<&Notice>, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{THEME}}", if theme == Theme::Dark { "dark" } else { "light" })
        .replace("{{NAV}}", &render_nav(identity))
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace("{{BODY}}", body)
}

fn render_nav(identity: Option<&Identity>) -> String {
    let Some(identity) = identity else {
        return String::new();
    };
    let admin_link = if identity.role == Role::Admin {
        r#"<a href="/admin">Admin</a>"#
    } else {
        ""
    };
    format!(
        r#"<nav><a href="/">Today</a>{admin_link}<span class="who">{name}</span><form method="post" action="/logout"><button class="link" type="submit">Log out</button></form></nav>"#,
        name = escape_html(&identity.name),
    )
}

fn render_notice(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let class = match notice.level {
        NoticeLevel::Info => "notice",
        NoticeLevel::Error => "notice error",
    };
    format!(
        r#"<div class="{class}" role="status"><strong>{}</strong> {}</div>"#,
        escape_html(&notice.title),
        escape_html(&notice.message),
    )
}

pub fn render_login(notice: Option<&Notice>) -> String {
    layout("Log in", Theme::Light, None, notice, LOGIN_BODY)
}

pub fn render_signup(notice: Option<&Notice>) -> String {
    layout("Sign up", Theme::Light, None, notice, SIGNUP_BODY)
}

pub fn render_waiting() -> String {
    layout("Loading", Theme::Light, None, None, r#"<p class="subtitle">Loading...</p>"#)
}

pub fn render_not_found(path: &str) -> String {
    let body = format!(
        r#"<h2>Page not found</h2><p class="subtitle">Nothing lives at <code>{}</code>.</p><p><a href="/">Return home</a></p>"#,
        escape_html(path)
    );
    layout("Not found", Theme::Light, None, None, &body)
}

pub fn render_index(page: &IndexPage<'_>, theme: Theme, notice: Option<&Notice>) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<header><h1>Hello, {name}</h1><p class="subtitle">{date}</p></header>"#,
        name = escape_html(&page.identity.name),
        date = escape_html(page.date),
    );

    body.push_str(r#"<section><h2>How are you feeling today?</h2><div class="moods">"#);
    for mood in Mood::ALL {
        let selected = if page.selected == Some(mood) { " selected" } else { "" };
        let _ = write!(
            body,
            r#"<form method="post" action="/mood/select"><input type="hidden" name="mood" value="{value}" /><button class="mood{selected}" style="--mood: {color}" type="submit">{label}</button></form>"#,
            value = mood.as_str(),
            color = mood.color(),
            label = mood.label(),
        );
    }
    body.push_str("</div>");

    match page.selected {
        Some(mood) => {
            let _ = write!(
                body,
                r#"<p class="feeling" style="--mood: {color}">Feeling {label}</p><form class="journal" method="post" action="/mood/log"><input type="hidden" name="mood" value="{value}" /><label for="context">{prompt}</label><textarea id="context" name="context" rows="4" placeholder="Write your thoughts here...">{context}</textarea><button type="submit">Log Mood</button></form>"#,
                color = mood.color(),
                label = mood.label(),
                value = mood.as_str(),
                prompt = escape_html(mood.prompt()),
                context = escape_html(page.context),
            );
        }
        None => body.push_str(r#"<p class="subtitle">Select a mood above to begin journaling</p>"#),
    }
    body.push_str("</section>");

    if let Some(suggestion) = page.last_suggestion {
        let class = if page.highlighted { "suggestion highlight" } else { "suggestion" };
        let _ = write!(
            body,
            r#"<section class="{class}"><h2>Try this</h2><h3>{}</h3><p>{}</p></section>"#,
            escape_html(suggestion.title),
            escape_html(suggestion.description),
        );
    }

    if let Some(mood) = page.selected {
        body.push_str(r#"<section><h2>Micro-habits for this mood</h2><ul class="cards">"#);
        for suggestion in suggestions_for(mood) {
            let _ = write!(
                body,
                "<li><strong>{}</strong><span>{}</span></li>",
                escape_html(suggestion.title),
                escape_html(suggestion.description),
            );
        }
        body.push_str("</ul></section>");
    }

    body.push_str(r#"<section><h2>Recent entries</h2>"#);
    if page.entries.is_empty() {
        body.push_str(r#"<p class="subtitle">No moods logged yet.</p>"#);
    } else {
        body.push_str(r#"<ul class="entries">"#);
        for entry in page.entries {
            let _ = write!(
                body,
                r#"<li style="--mood: {color}"><span class="tag">{label}</span><time>{time}</time><p>{context}</p></li>"#,
                color = entry.mood.color(),
                label = entry.mood.label(),
                time = entry.created_at.format("%b %-d, %Y %H:%M"),
                context = escape_html(entry.context.as_deref().unwrap_or("")),
            );
        }
        body.push_str("</ul>");
    }
    body.push_str("</section>");

    layout("MicroMood", theme, Some(page.identity), notice, &body)
}

pub fn render_admin(page: &AdminPage<'_>, theme: Theme, notice: Option<&Notice>) -> String {
    let summary = page.dashboard;
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<header><h1>Admin dashboard</h1><p class="subtitle">Signed in as {}</p></header><section class="panel"><div class="stat"><span class="label">Employees</span><span class="value">{}</span></div><div class="stat"><span class="label">Mood entries</span><span class="value">{}</span></div><div class="stat"><span class="label">Micro-habits</span><span class="value">{}</span></div><div class="stat"><span class="label">Mood images</span><span class="value">{}</span></div></section>"#,
        escape_html(&page.identity.email),
        summary.total_employees,
        summary.mood_entries,
        summary.library_habits,
        summary.mood_images,
    );

    if page.settings.show_analytics {
        body.push_str(r#"<section><h2>Recent moods</h2><ul class="entries">"#);
        for entry in &summary.recent_moods {
            let _ = write!(
                body,
                r#"<li style="--mood: {}"><span class="tag">{}</span><time>{}</time></li>"#,
                entry.mood.color(),
                entry.mood.label(),
                entry.created_at.format("%b %-d, %Y %H:%M"),
            );
        }
        body.push_str("</ul></section>");
    }

    body.push_str(r#"<section><h2>Recent activity</h2><ul class="entries">"#);
    for activity in page.activity {
        let _ = write!(
            body,
            r#"<li><strong>{}</strong> <span class="subtitle">{} by {}</span><time>{}</time></li>"#,
            escape_html(&activity.action),
            escape_html(&activity.detail),
            escape_html(&activity.performed_by.name),
            activity.created_at.format("%b %-d, %Y %H:%M"),
        );
    }
    body.push_str("</ul></section>");

    body.push_str(r#"<section><h2>Employees</h2><table><tr><th>Name</th><th>Email</th><th>Role</th></tr>"#);
    for employee in page.employees {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&employee.name),
            escape_html(&employee.email),
            employee.role,
        );
    }
    body.push_str("</table></section>");

    body.push_str(r#"<section><h2>Habit library</h2><table><tr><th>Title</th><th>Description</th><th>Mood</th></tr>"#);
    for habit in page.library {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&habit.title),
            escape_html(&habit.description),
            habit.mood.label(),
        );
    }
    body.push_str("</table></section>");

    body.push_str(r#"<section><h2>Mood images</h2><table><tr><th>Path</th><th>Caption</th><th>Tags</th></tr>"#);
    for image in page.images {
        let tags: Vec<&str> = image.tags.iter().map(|tag| tag.as_str()).collect();
        let _ = write!(
            body,
            "<tr><td><code>{}</code></td><td>{}</td><td>{}</td></tr>",
            escape_html(&image.path),
            escape_html(&image.caption),
            tags.join(", "),
        );
    }
    body.push_str("</table></section>");

    layout("MicroMood Admin", theme, Some(page.identity), notice, &body)
}

const LOGIN_BODY: &str = r#"<header><h1>MicroMood</h1><p class="subtitle">Nurturing emotional balance through mindful reflection.</p></header>
<form class="auth" method="post" action="/login">
  <label>Email <input type="email" name="email" required /></label>
  <label>Password <input type="password" name="password" required /></label>
  <button type="submit">Log in</button>
</form>
<p class="subtitle">New here? <a href="/signup">Create an account</a></p>"#;

const SIGNUP_BODY: &str = r#"<header><h1>Create your account</h1><p class="subtitle">Start tracking your moods in under a minute.</p></header>
<form class="auth" method="post" action="/signup">
  <label>Name <input type="text" name="name" required /></label>
  <label>Email <input type="email" name="email" required /></label>
  <label>Password <input type="password" name="password" minlength="6" required /></label>
  <button type="submit">Sign up</button>
</form>
<p class="subtitle">Already registered? <a href="/login">Log in</a></p>"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{THEME}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f4f1fb;
      --bg-2: #d9cff7;
      --ink: #2b2a33;
      --accent: #9b87f5;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    [data-theme="dark"] {
      --bg-1: #1b1a24;
      --bg-2: #2e2748;
      --ink: #ecebf5;
      --card: rgba(36, 34, 48, 0.92);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ece6fb 60%, #f7f5fc 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #6f6a80;
    }

    nav {
      display: flex;
      gap: 16px;
      align-items: center;
    }

    nav .who {
      margin-left: auto;
      color: #6f6a80;
    }

    .notice {
      padding: 12px 16px;
      border-radius: 14px;
      background: #e7f7ef;
    }

    .notice.error {
      background: #fde4ea;
    }

    .moods {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.mood {
      background: white;
      color: var(--ink);
      border: 2px solid var(--mood);
    }

    button.mood.selected {
      background: var(--mood);
      color: white;
    }

    button.link {
      background: none;
      color: var(--accent-2);
      padding: 0;
    }

    .feeling {
      border-left: 6px solid var(--mood);
      padding-left: 12px;
    }

    form.journal, form.auth {
      display: grid;
      gap: 12px;
    }

    textarea, input {
      width: 100%;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 12px;
      font: inherit;
    }

    .suggestion {
      border-radius: 18px;
      padding: 18px;
      background: white;
    }

    .suggestion.highlight {
      box-shadow: 0 0 0 3px var(--accent);
    }

    .cards, .entries {
      list-style: none;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .cards li, .entries li {
      background: white;
      border-radius: 14px;
      padding: 12px 16px;
      display: grid;
      gap: 4px;
      border-left: 6px solid var(--mood, var(--accent));
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 8px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.1);
    }
  </style>
</head>
<body>
  <main class="app">
    {{NAV}}
    {{NOTICE}}
    {{BODY}}
  </main>
</body>
</html>
"#;
