//! Server-rendered HTML pages.
//!
//! All user-supplied text goes through [`escape`].

use crate::domain::{Listing, Region, Restaurant};
use serde_json::Value as JsonValue;
use std::fmt::Write;

/// Escapes text for use in element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-Hant-TW">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<header><a href="/">美食投稿板</a> · <a href="/post">我要投稿</a></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape(value),
        if selected { " selected" } else { "" },
        escape(label)
    )
}

pub fn render_index(listing: &Listing) -> String {
    let query = &listing.query;
    let mut body = String::new();

    let mut region_options = option("", "全部區域", query.region_text().is_empty());
    for region in &listing.regions {
        region_options.push_str(&option(region, region, query.region_text() == region.as_str()));
    }
    let mut city_options = option("", "全部城市", query.city_text().is_empty());
    for city in &listing.cities {
        city_options.push_str(&option(city, city, query.city_text() == city.as_str()));
    }

    let _ = write!(
        body,
        r#"<form class="filters" method="get" action="/">
<input type="search" name="keyword" placeholder="搜尋店名、城市、行政區" value="{keyword}">
<select name="region">{region_options}</select>
<select name="city">{city_options}</select>
<button type="submit">搜尋</button>
</form>
<p class="count">共 {total} 間餐廳</p>
"#,
        keyword = escape(query.keyword_text()),
        total = listing.total,
    );

    if listing.restaurants.is_empty() {
        body.push_str("<p class=\"empty\">目前沒有符合條件的餐廳。</p>\n");
    } else {
        body.push_str("<ul class=\"restaurants\">\n");
        for r in &listing.restaurants {
            let _ = writeln!(
                body,
                r#"<li><a href="/detail/{id}">{name}</a> <span class="where">{city}{district}</span> <span class="comments">{count} 則留言</span></li>"#,
                id = escape(&r.id),
                name = escape(&r.name),
                city = escape(&r.city),
                district = escape(r.district.as_deref().unwrap_or("")),
                count = r.comments.len(),
            );
        }
        body.push_str("</ul>\n");
    }

    layout("美食投稿板", &body)
}

pub fn render_post_form() -> String {
    let mut region_options = option("", "請選擇", true);
    for region in Region::ALL {
        region_options.push_str(&option(region.label(), region.label(), false));
    }

    let body = format!(
        r#"<h1>投稿新餐廳</h1>
<form id="post-form" method="post" action="/api/restaurants">
<label>餐廳名稱 <input name="name" required></label>
<label>地址 <input name="address" required></label>
<label>城市 <input name="city" placeholder="例如：台北市"></label>
<label>行政區 <input name="district" placeholder="例如：大安區"></label>
<label>區域 <select name="region">{region_options}</select></label>
<label>推薦菜色 <input name="dish"></label>
<label>介紹 <textarea name="description"></textarea></label>
<button type="submit">送出</button>
</form>
<p id="result"></p>
<script>
document.getElementById('post-form').addEventListener('submit', async (e) => {{
  e.preventDefault();
  const body = Object.fromEntries(new FormData(e.target));
  const res = await fetch('/api/restaurants', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify(body)
  }});
  const out = await res.json();
  document.getElementById('result').textContent = out.message || '';
  if (out.success) setTimeout(() => {{ location.href = '/'; }}, 800);
}});
</script>
"#
    );
    layout("投稿新餐廳", &body)
}

fn render_extra_value(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => escape(s),
        other => escape(&other.to_string()),
    }
}

pub fn render_detail(r: &Restaurant) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<h1>{name}</h1>
<dl>
<dt>地址</dt><dd>{address}</dd>
<dt>城市</dt><dd>{city}</dd>
<dt>行政區</dt><dd>{district}</dd>
"#,
        name = escape(&r.name),
        address = escape(&r.address),
        city = escape(&r.city),
        district = escape(r.district.as_deref().unwrap_or("")),
    );
    for (key, value) in &r.extra {
        let _ = writeln!(
            body,
            "<dt>{}</dt><dd>{}</dd>",
            escape(key),
            render_extra_value(value)
        );
    }
    body.push_str("</dl>\n<h2>留言</h2>\n<ul class=\"comments\">\n");
    for c in &r.comments {
        let _ = writeln!(
            body,
            r#"<li><p>{}</p><time>{}</time></li>"#,
            escape(&c.text),
            escape(&c.date)
        );
    }
    let _ = write!(
        body,
        r#"</ul>
<form id="comment-form" data-id="{id}" method="post" action="/api/restaurants/{id}/comments">
<textarea name="text" required></textarea>
<button type="submit">留言</button>
</form>
<script>
document.getElementById('comment-form').addEventListener('submit', async (e) => {{
  e.preventDefault();
  const id = e.target.dataset.id;
  const text = new FormData(e.target).get('text');
  const res = await fetch('/api/restaurants/' + encodeURIComponent(id) + '/comments', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify({{ text }})
  }});
  const out = await res.json();
  if (out.success) location.reload(); else alert(out.message);
}});
</script>
"#,
        id = escape(&r.id),
    );
    layout(&r.name, &body)
}
