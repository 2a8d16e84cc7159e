//! HTML templates
//!
//! Templates are compiled into the binary and rendered with minijinja.
//! Every page extends `layout.html`; handlers pass the current principal as
//! `user` so the navigation can reflect role and login state.

use crate::error::Result;
use axum::response::Html;
use minijinja::Environment;

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Keydesk{% endblock %}</title>
    <style>
        body { font-family: system-ui, sans-serif; margin: 0; background: #f5f5f4; color: #1c1917; }
        nav { display: flex; gap: 1rem; align-items: center; background: #1c1917; color: #fafaf9; padding: 0.6rem 1.2rem; }
        nav a { color: #d6d3d1; text-decoration: none; }
        nav a:hover { color: #fff; }
        nav .brand { font-weight: 700; color: #fff; margin-right: 1rem; }
        nav .spacer { flex: 1; }
        main { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
        table { border-collapse: collapse; width: 100%; background: #fff; }
        th, td { text-align: left; padding: 0.45rem 0.6rem; border-bottom: 1px solid #e7e5e4; }
        th { background: #fafaf9; }
        form.filters { display: flex; gap: 0.5rem; flex-wrap: wrap; margin-bottom: 1rem; }
        form.record label { display: block; margin-bottom: 0.7rem; }
        form.record input[type=text], form.record input[type=password], form.record input[type=number],
        form.record input[type=date], form.record select, form.record textarea { width: 100%; max-width: 28rem; padding: 0.3rem; }
        .error { color: #b91c1c; }
        .actions { margin: 1rem 0; }
        .stat-grid { display: flex; gap: 1rem; flex-wrap: wrap; }
        .stat { background: #fff; border: 1px solid #e7e5e4; padding: 1rem 1.4rem; min-width: 10rem; }
        .stat .value { font-size: 1.8rem; font-weight: 700; }
        button, .button { background: #1c1917; color: #fff; border: 0; padding: 0.4rem 0.9rem; cursor: pointer; text-decoration: none; display: inline-block; }
        button.danger { background: #b91c1c; }
    </style>
</head>
<body>
{% if user %}
<nav>
    <span class="brand">Keydesk</span>
    <a href="/">Dashboard</a>
    <a href="/customers">Customers</a>
    <a href="/products">Products</a>
    <a href="/licenses">Licenses</a>
    {% if user.role == "admin" %}<a href="/admin/users">Users</a>{% endif %}
    <span class="spacer"></span>
    <span>{{ user.username }}</span>
    <a href="/logout">Logout</a>
</nav>
{% endif %}
<main>
{% block content %}{% endblock %}
</main>
</body>
</html>
"#;

const LOGIN: &str = r#"{% extends "layout.html" %}
{% block title %}Login - Keydesk{% endblock %}
{% block content %}
<h1>Login</h1>
{% if error %}<p class="error">{{ error }}</p>{% endif %}
<form class="record" method="post" action="/login">
    <label>Username <input type="text" name="username" required autofocus></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Sign in</button>
</form>
{% endblock %}
"#;

const DASHBOARD: &str = r#"{% extends "layout.html" %}
{% block content %}
<h1>Dashboard</h1>
<div class="stat-grid">
    <div class="stat"><div class="value">{{ stats.customers_count }}</div>Customers</div>
    <div class="stat"><div class="value">{{ stats.licenses_active }}</div>Active licenses</div>
    <div class="stat"><div class="value">{{ stats.licenses_expiring_30 }}</div><a href="/licenses?expiring=30">Expiring in 30 days</a></div>
    <div class="stat"><div class="value">{{ stats.licenses_expiring_90 }}</div><a href="/licenses?expiring=90">Expiring in 90 days</a></div>
</div>
{% endblock %}
"#;

const CUSTOMERS_LIST: &str = r#"{% extends "layout.html" %}
{% block title %}Customers - Keydesk{% endblock %}
{% block content %}
<h1>Customers</h1>
<form class="filters" method="get" action="/customers">
    <input type="text" name="q" placeholder="Search" value="{{ q or '' }}">
    <button type="submit">Search</button>
</form>
<div class="actions"><a class="button" href="/customers/new">New customer</a></div>
<table>
    <tr><th>Number</th><th>Name</th><th>Contact</th><th>Email</th></tr>
    {% for c in customers %}
    <tr>
        <td>{{ c.customer_number }}</td>
        <td><a href="/customers/{{ c.id }}">{{ c.name }}</a></td>
        <td>{{ c.contact_name or "" }}</td>
        <td>{{ c.contact_email or "" }}</td>
    </tr>
    {% endfor %}
</table>
{% endblock %}
"#;

const CUSTOMER_DETAIL: &str = r#"{% extends "layout.html" %}
{% block title %}{{ customer.name }} - Keydesk{% endblock %}
{% block content %}
<h1>{{ customer.name }}</h1>
<table>
    <tr><th>Customer number</th><td>{{ customer.customer_number }}</td></tr>
    <tr><th>Contact</th><td>{{ customer.contact_name or "" }}</td></tr>
    <tr><th>Email</th><td>{{ customer.contact_email or "" }}</td></tr>
    <tr><th>Phone</th><td>{{ customer.contact_phone or "" }}</td></tr>
    <tr><th>Notes</th><td>{{ customer.notes or "" }}</td></tr>
</table>
<div class="actions">
    <a class="button" href="/customers/{{ customer.id }}/edit">Edit</a>
    <a class="button" href="/licenses?customer_id={{ customer.id }}">Licenses</a>
    <form method="post" action="/customers/{{ customer.id }}/delete" style="display:inline"
          onsubmit="return confirm('Delete this customer and its licenses?')">
        <button class="danger" type="submit">Delete</button>
    </form>
</div>
{% endblock %}
"#;

const CUSTOMER_FORM: &str = r#"{% extends "layout.html" %}
{% block title %}{{ "Edit customer" if customer else "New customer" }} - Keydesk{% endblock %}
{% block content %}
<h1>{{ "Edit customer" if customer else "New customer" }}</h1>
<form class="record" method="post" action="{{ "/customers/" ~ customer.id ~ "/edit" if customer else "/customers/new" }}">
    <label>Customer number <input type="text" name="customer_number" value="{{ customer.customer_number if customer else '' }}" required></label>
    <label>Name <input type="text" name="name" value="{{ customer.name if customer else '' }}" required></label>
    <label>Contact name <input type="text" name="contact_name" value="{{ customer.contact_name or '' if customer else '' }}"></label>
    <label>Contact email <input type="text" name="contact_email" value="{{ customer.contact_email or '' if customer else '' }}"></label>
    <label>Contact phone <input type="text" name="contact_phone" value="{{ customer.contact_phone or '' if customer else '' }}"></label>
    <label>Notes <textarea name="notes">{{ customer.notes or '' if customer else '' }}</textarea></label>
    <button type="submit">Save</button>
</form>
{% endblock %}
"#;

const PRODUCTS_LIST: &str = r#"{% extends "layout.html" %}
{% block title %}Products - Keydesk{% endblock %}
{% block content %}
<h1>Products</h1>
<div class="actions"><a class="button" href="/products/new">New product</a></div>
<table>
    <tr><th>Name</th><th>Category</th><th>Manufacturer</th></tr>
    {% for p in products %}
    <tr>
        <td><a href="/products/{{ p.id }}">{{ p.name }}</a></td>
        <td>{{ p.category or "" }}</td>
        <td>{{ p.manufacturer or "" }}</td>
    </tr>
    {% endfor %}
</table>
{% endblock %}
"#;

const PRODUCT_DETAIL: &str = r#"{% extends "layout.html" %}
{% block title %}{{ product.name }} - Keydesk{% endblock %}
{% block content %}
<h1>{{ product.name }}</h1>
<table>
    <tr><th>Category</th><td>{{ product.category or "" }}</td></tr>
    <tr><th>Manufacturer</th><td>{{ product.manufacturer or "" }}</td></tr>
    <tr><th>Notes</th><td>{{ product.notes or "" }}</td></tr>
</table>
<div class="actions">
    <a class="button" href="/products/{{ product.id }}/edit">Edit</a>
    <a class="button" href="/licenses?product_id={{ product.id }}">Licenses</a>
    <form method="post" action="/products/{{ product.id }}/delete" style="display:inline"
          onsubmit="return confirm('Delete this product and its licenses?')">
        <button class="danger" type="submit">Delete</button>
    </form>
</div>
{% endblock %}
"#;

const PRODUCT_FORM: &str = r#"{% extends "layout.html" %}
{% block title %}{{ "Edit product" if product else "New product" }} - Keydesk{% endblock %}
{% block content %}
<h1>{{ "Edit product" if product else "New product" }}</h1>
<form class="record" method="post" action="{{ "/products/" ~ product.id ~ "/edit" if product else "/products/new" }}">
    <label>Name <input type="text" name="name" value="{{ product.name if product else '' }}" required></label>
    <label>Category <input type="text" name="category" value="{{ product.category or '' if product else '' }}"></label>
    <label>Manufacturer <input type="text" name="manufacturer" value="{{ product.manufacturer or '' if product else '' }}"></label>
    <label>Notes <textarea name="notes">{{ product.notes or '' if product else '' }}</textarea></label>
    <button type="submit">Save</button>
</form>
{% endblock %}
"#;

const LICENSES_LIST: &str = r#"{% extends "layout.html" %}
{% block title %}Licenses - Keydesk{% endblock %}
{% block content %}
<h1>Licenses</h1>
<form class="filters" method="get" action="/licenses">
    <select name="expiring">
        <option value="">Any end date</option>
        <option value="30" {% if expiring == "30" %}selected{% endif %}>Ends in 30 days</option>
        <option value="60" {% if expiring == "60" %}selected{% endif %}>Ends in 60 days</option>
        <option value="90" {% if expiring == "90" %}selected{% endif %}>Ends in 90 days</option>
        <option value="expired" {% if expiring == "expired" %}selected{% endif %}>Expired</option>
    </select>
    <select name="status">
        <option value="all">Any status</option>
        <option value="active" {% if status == "active" %}selected{% endif %}>active</option>
        <option value="expired" {% if status == "expired" %}selected{% endif %}>expired</option>
        <option value="cancelled" {% if status == "cancelled" %}selected{% endif %}>cancelled</option>
    </select>
    <select name="customer_id">
        <option value="">Any customer</option>
        {% for c in customers %}
        <option value="{{ c.id }}" {% if customer_id == c.id %}selected{% endif %}>{{ c.name }}</option>
        {% endfor %}
    </select>
    <select name="product_id">
        <option value="">Any product</option>
        {% for p in products %}
        <option value="{{ p.id }}" {% if product_id == p.id %}selected{% endif %}>{{ p.name }}</option>
        {% endfor %}
    </select>
    <input type="text" name="q" placeholder="Search" value="{{ q or '' }}">
    <button type="submit">Filter</button>
</form>
<div class="actions"><a class="button" href="/licenses/new">New license</a></div>
<table>
    <tr><th>Key</th><th>Customer</th><th>Product</th><th>Seats</th><th>End date</th><th>Status</th></tr>
    {% for l in licenses %}
    <tr>
        <td><a href="/licenses/{{ l.id }}">{{ l.license_key or "(no key)" }}</a></td>
        <td>{{ l.customer_name }}</td>
        <td>{{ l.product_name }}</td>
        <td>{{ l.seats or "" }}</td>
        <td>{{ l.end_date or "" }}</td>
        <td>{{ l.status or "" }}</td>
    </tr>
    {% endfor %}
</table>
{% endblock %}
"#;

const LICENSE_DETAIL: &str = r#"{% extends "layout.html" %}
{% block title %}License - Keydesk{% endblock %}
{% block content %}
<h1>{{ license.license_key or "License" }}</h1>
<table>
    <tr><th>Customer</th><td><a href="/customers/{{ license.customer_id }}">{{ license.customer_name }}</a></td></tr>
    <tr><th>Product</th><td><a href="/products/{{ license.product_id }}">{{ license.product_name }}</a></td></tr>
    <tr><th>Seats</th><td>{{ license.seats or "" }}</td></tr>
    <tr><th>Start date</th><td>{{ license.start_date or "" }}</td></tr>
    <tr><th>End date</th><td>{{ license.end_date or "" }}</td></tr>
    <tr><th>Interval</th><td>{{ license.interval or "" }}</td></tr>
    <tr><th>Price</th><td>{{ license.price or "" }}</td></tr>
    <tr><th>Status</th><td>{{ license.status or "" }}</td></tr>
    <tr><th>Notes</th><td>{{ license.notes or "" }}</td></tr>
</table>
<div class="actions">
    <a class="button" href="/licenses/{{ license.id }}/edit">Edit</a>
    <form method="post" action="/licenses/{{ license.id }}/delete" style="display:inline"
          onsubmit="return confirm('Delete this license?')">
        <button class="danger" type="submit">Delete</button>
    </form>
</div>
{% endblock %}
"#;

const LICENSE_FORM: &str = r#"{% extends "layout.html" %}
{% block title %}{{ "Edit license" if license else "New license" }} - Keydesk{% endblock %}
{% block content %}
<h1>{{ "Edit license" if license else "New license" }}</h1>
<form class="record" method="post" action="{{ "/licenses/" ~ license.id ~ "/edit" if license else "/licenses/new" }}">
    <label>Customer
        <select name="customer_id" required>
            {% for c in customers %}
            <option value="{{ c.id }}" {% if license and license.customer_id == c.id %}selected{% endif %}>{{ c.name }}</option>
            {% endfor %}
        </select>
    </label>
    <label>Product
        <select name="product_id" required>
            {% for p in products %}
            <option value="{{ p.id }}" {% if license and license.product_id == p.id %}selected{% endif %}>{{ p.name }}</option>
            {% endfor %}
        </select>
    </label>
    <label>License key <input type="text" name="license_key" value="{{ license.license_key or '' if license else '' }}"></label>
    <label>Seats <input type="number" name="seats" min="1" value="{{ license.seats or '' if license else '' }}"></label>
    <label>Start date <input type="date" name="start_date" value="{{ license.start_date or '' if license else '' }}"></label>
    <label>End date <input type="date" name="end_date" value="{{ license.end_date or '' if license else '' }}"></label>
    <label>Interval <input type="text" name="interval" value="{{ license.interval or '' if license else '' }}" placeholder="monthly, yearly, ..."></label>
    <label>Price <input type="text" name="price" value="{{ license.price or '' if license else '' }}"></label>
    <label>Status
        <select name="status">
            <option value="active" {% if license and license.status == "active" %}selected{% endif %}>active</option>
            <option value="expired" {% if license and license.status == "expired" %}selected{% endif %}>expired</option>
            <option value="cancelled" {% if license and license.status == "cancelled" %}selected{% endif %}>cancelled</option>
        </select>
    </label>
    <label>Notes <textarea name="notes">{{ license.notes or '' if license else '' }}</textarea></label>
    <button type="submit">Save</button>
</form>
{% endblock %}
"#;

const USERS_LIST: &str = r#"{% extends "layout.html" %}
{% block title %}Users - Keydesk{% endblock %}
{% block content %}
<h1>Users</h1>
<div class="actions"><a class="button" href="/admin/users/new">New user</a></div>
<table>
    <tr><th>Username</th><th>Role</th><th>Active</th><th></th></tr>
    {% for u in users %}
    <tr>
        <td>{{ u.username }}</td>
        <td>{{ u.role }}</td>
        <td>{{ "yes" if u.active else "no" }}</td>
        <td>
            <a href="/admin/users/{{ u.id }}/edit">Edit</a>
            <a href="/admin/users/{{ u.id }}/reset-password">Reset password</a>
        </td>
    </tr>
    {% endfor %}
</table>
{% endblock %}
"#;

const USER_FORM: &str = r#"{% extends "layout.html" %}
{% block title %}{{ "Edit user" if user_obj else "New user" }} - Keydesk{% endblock %}
{% block content %}
<h1>{{ "Edit user" if user_obj else "New user" }}</h1>
<form class="record" method="post" action="{{ "/admin/users/" ~ user_obj.id ~ "/edit" if user_obj else "/admin/users/new" }}">
    <label>Username <input type="text" name="username" value="{{ user_obj.username if user_obj else '' }}" required></label>
    {% if not user_obj %}
    <label>Password <input type="password" name="password" required></label>
    {% endif %}
    <label>Role
        <select name="role">
            <option value="user" {% if user_obj and user_obj.role == "user" %}selected{% endif %}>user</option>
            <option value="admin" {% if user_obj and user_obj.role == "admin" %}selected{% endif %}>admin</option>
        </select>
    </label>
    <label>Active
        <select name="active">
            <option value="true" {% if not user_obj or user_obj.active %}selected{% endif %}>active</option>
            <option value="false" {% if user_obj and not user_obj.active %}selected{% endif %}>locked</option>
        </select>
    </label>
    <button type="submit">Save</button>
</form>
{% endblock %}
"#;

const USER_RESET_PASSWORD: &str = r#"{% extends "layout.html" %}
{% block title %}Reset password - Keydesk{% endblock %}
{% block content %}
<h1>Reset password for {{ user_obj.username }}</h1>
<form class="record" method="post" action="/admin/users/{{ user_obj.id }}/reset-password">
    <label>New password <input type="password" name="password" required></label>
    <button type="submit">Reset</button>
</form>
{% endblock %}
"#;

/// The compiled template set
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("layout.html", LAYOUT)?;
        env.add_template("login.html", LOGIN)?;
        env.add_template("index.html", DASHBOARD)?;
        env.add_template("customers_list.html", CUSTOMERS_LIST)?;
        env.add_template("customer_detail.html", CUSTOMER_DETAIL)?;
        env.add_template("customer_form.html", CUSTOMER_FORM)?;
        env.add_template("products_list.html", PRODUCTS_LIST)?;
        env.add_template("product_detail.html", PRODUCT_DETAIL)?;
        env.add_template("product_form.html", PRODUCT_FORM)?;
        env.add_template("licenses_list.html", LICENSES_LIST)?;
        env.add_template("license_detail.html", LICENSE_DETAIL)?;
        env.add_template("license_form.html", LICENSE_FORM)?;
        env.add_template("users_list.html", USERS_LIST)?;
        env.add_template("user_form.html", USER_FORM)?;
        env.add_template("user_reset_password.html", USER_RESET_PASSWORD)?;
        Ok(Self { env })
    }

    /// Render a template to an HTML response
    pub fn render(&self, name: &str, ctx: minijinja::Value) -> Result<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_compile() {
        Templates::new().expect("templates must compile");
    }

    #[test]
    fn test_login_renders_error() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render(
                "login.html",
                context! { user => None::<()>, error => "Username or password is incorrect." },
            )
            .unwrap();
        assert!(html.0.contains("Username or password is incorrect."));
    }

    #[test]
    fn test_nav_hides_users_link_for_plain_users() {
        let templates = Templates::new().unwrap();
        let user = crate::auth::Principal {
            id: 1,
            username: "alice".to_string(),
            role: crate::auth::UserRole::User,
        };
        let html = templates
            .render(
                "index.html",
                context! {
                    user => user,
                    stats => crate::store::DashboardStats {
                        customers_count: 0,
                        licenses_active: 0,
                        licenses_expiring_30: 0,
                        licenses_expiring_90: 0,
                    },
                },
            )
            .unwrap();
        assert!(!html.0.contains("/admin/users"));
        assert!(html.0.contains("alice"));
    }
}
