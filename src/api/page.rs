//! Presentation page
//!
//! A single HTML document; all data comes from the JSON endpoints.

use axum::response::{Html, IntoResponse};

/// GET /
///
/// Renders the login view or the repository list, depending on what
/// `/api/repos` answers.
pub(super) async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>GitHub Repository Viewer</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
    .error { color: #b91c1c; }
    .repo { border: 1px solid #e5e7eb; border-radius: .5rem; padding: .75rem 1rem; margin: .5rem 0; }
    .badge { font-size: .75rem; border-radius: 999px; padding: 0 .5rem; margin-left: .5rem; background: #f3f4f6; }
    .meta { color: #6b7280; font-size: .875rem; }
    [hidden] { display: none; }
  </style>
</head>
<body>
  <h1>GitHub Repository Viewer</h1>
  <p id="loading">Loading...</p>
  <p id="error" class="error" hidden></p>

  <section id="login" hidden>
    <p>Connect your GitHub account to view your repositories.</p>
    <p><a id="login-link" href="/api/auth/login">Login with GitHub</a></p>
    <p id="install" hidden>
      To list private repositories, <a id="install-link" href="/api/auth/install" target="_blank" rel="noopener">install the GitHub App</a>.
    </p>
    <p id="client-id" class="meta"></p>
  </section>

  <section id="repos" hidden>
    <p>
      <button id="refresh" type="button">Refresh</button>
      <a href="/api/auth/logout">Logout</a>
    </p>
    <div id="repo-list"></div>
  </section>

  <script>
    const $ = (id) => document.getElementById(id);

    function showError(message) {
      $("error").textContent = "Error: " + message;
      $("error").hidden = false;
    }

    const params = new URLSearchParams(window.location.search);
    if (params.has("error")) {
      const details = params.get("details");
      showError(params.get("error") + (details ? " (" + details + ")" : ""));
    }

    function renderRepo(repo) {
      const item = document.createElement("div");
      item.className = "repo";

      const title = document.createElement("a");
      title.href = repo.html_url;
      title.textContent = repo.name;
      item.appendChild(title);

      for (const [flag, label] of [[repo.private, "Private"], [repo.archived, "Archived"]]) {
        if (flag) {
          const badge = document.createElement("span");
          badge.className = "badge";
          badge.textContent = label;
          item.appendChild(badge);
        }
      }

      if (repo.description) {
        const description = document.createElement("p");
        description.textContent = repo.description;
        item.appendChild(description);
      }

      const meta = document.createElement("div");
      meta.className = "meta";
      const parts = [];
      if (repo.language) parts.push(repo.language);
      parts.push("★ " + repo.stargazers_count);
      if (repo.updated_at) parts.push("Updated " + new Date(repo.updated_at).toLocaleDateString());
      meta.textContent = parts.join(" · ");
      item.appendChild(meta);

      return item;
    }

    async function loadConfig() {
      const response = await fetch("/api/config");
      if (!response.ok) return;
      const config = await response.json();
      $("client-id").textContent = "Client ID: " + config.client_id;
      $("install").hidden = !config.install_url;
    }

    async function fetchRepos() {
      $("loading").hidden = false;
      try {
        const response = await fetch("/api/repos");
        if (response.status === 401) {
          $("login").hidden = false;
          $("repos").hidden = true;
          await loadConfig();
          return;
        }
        const body = await response.json();
        if (!response.ok) {
          throw new Error(body.error || "Failed to fetch repositories");
        }
        const list = $("repo-list");
        list.replaceChildren(...body.repos.map(renderRepo));
        $("login").hidden = true;
        $("repos").hidden = false;
      } catch (err) {
        showError(err instanceof Error ? err.message : "An error occurred");
      } finally {
        $("loading").hidden = true;
      }
    }

    $("refresh").addEventListener("click", fetchRepos);
    fetchRepos();
  </script>
</body>
</html>
"#;
