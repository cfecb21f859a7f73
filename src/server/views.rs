//! Text renderings of list results for tool output.

use crate::domain::{format_currency, format_date, format_phone};
use crate::models::{
    Birthday, Community, Contribution, KindTotals, Page, Parish, PeriodTotal, Tither,
};
use crate::services::Dashboard;
use crate::table::{Column, Table};

fn dash_if_empty(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

pub fn tither_table() -> Table<Tither> {
    Table::new()
        .column(Column::right("ID", |t: &Tither| t.id.to_string()))
        .column(Column::new("Nome", |t: &Tither| t.name.clone()))
        .column(Column::new("CPF", |t: &Tither| dash_if_empty(t.display_cpf())))
        .column(Column::new("Telefone", |t: &Tither| {
            dash_if_empty(t.display_phone())
        }))
        .column(Column::new("Nascimento", |t: &Tither| {
            t.birth_date.map(format_date).unwrap_or_else(|| "-".to_string())
        }))
        .column(Column::right("Comunidade", |t: &Tither| {
            t.community_id.to_string()
        }))
        .column(Column::new("Status", |t: &Tither| {
            if t.active { "Ativo" } else { "Inativo" }.to_string()
        }))
        .empty_message("Nenhum dizimista encontrado.")
}

pub fn contribution_table() -> Table<Contribution> {
    Table::new()
        .column(Column::right("ID", |c: &Contribution| c.id.to_string()))
        .column(Column::new("Data", |c: &Contribution| format_date(c.date)))
        .column(Column::new("Tipo", |c: &Contribution| c.kind.label().to_string()))
        .column(Column::right("Valor", |c: &Contribution| {
            format_currency(c.amount)
        }))
        .column(Column::new("Forma", |c: &Contribution| {
            c.payment_method
                .map(|m| m.label().to_string())
                .unwrap_or_else(|| "-".to_string())
        }))
        .column(Column::new("Referência", |c: &Contribution| {
            c.reference_month
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string())
        }))
        .column(Column::new("Dizimista", |c: &Contribution| {
            c.tither_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "Anônimo".to_string())
        }))
        .empty_message("Nenhuma contribuição encontrada.")
}

pub fn parish_table() -> Table<Parish> {
    Table::new()
        .column(Column::right("ID", |p: &Parish| p.id.to_string()))
        .column(Column::new("Nome", |p: &Parish| p.name.clone()))
        .empty_message("Nenhuma paróquia encontrada.")
}

pub fn community_table() -> Table<Community> {
    Table::new()
        .column(Column::right("ID", |c: &Community| c.id.to_string()))
        .column(Column::new("Nome", |c: &Community| c.name.clone()))
        .column(Column::right("Paróquia", |c: &Community| {
            c.parish_id.to_string()
        }))
        .empty_message("Nenhuma comunidade encontrada.")
}

pub fn birthday_table() -> Table<Birthday> {
    Table::new()
        .column(Column::new("Nome", |b: &Birthday| b.name.clone()))
        .column(Column::new("Aniversário", |b: &Birthday| {
            b.birth_date.format("%d/%m").to_string()
        }))
        .column(Column::right("Idade", |b: &Birthday| {
            b.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
        }))
        .column(Column::new("Quando", |b: &Birthday| match b.days_until {
            Some(0) => "Hoje".to_string(),
            Some(1) => "Amanhã".to_string(),
            Some(n) => format!("Em {} dias", n),
            None => "-".to_string(),
        }))
        .column(Column::new("Telefone", |b: &Birthday| {
            b.phone
                .as_deref()
                .map(format_phone)
                .unwrap_or_else(|| "-".to_string())
        }))
        .column(Column::new("Comunidade", |b: &Birthday| {
            dash_if_empty(b.community_name.clone())
        }))
        .empty_message("Nenhum aniversariante no período.")
}

/// Page header followed by the table.
pub fn render_page<T>(table: &Table<T>, page: &Page<T>) -> String {
    if page.items.is_empty() {
        return table.render(&page.items);
    }
    format!(
        "Página {} de {} ({} no total)\n{}",
        page.page,
        page.total_pages.max(1),
        page.total,
        table.render(&page.items)
    )
}

/// Summary lines for a financial report.
pub fn render_financial_summary(period: &PeriodTotal, by_kind: &KindTotals) -> String {
    let mut out = format!(
        "Período: {} a {}\nTotal: {} ({} contribuições)\n",
        format_date(period.start_date),
        format_date(period.end_date),
        format_currency(period.total),
        period.count
    );
    for kind_total in &by_kind.totals {
        out.push_str(&format!(
            "  {}: {} ({})\n",
            kind_total.kind.label(),
            format_currency(kind_total.total),
            kind_total.count
        ));
    }
    out
}

/// Overview figures followed by today's birthdays.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = format!(
        "Dizimistas ativos: {}\nContribuições registradas: {}\nTotal do mês ({} a {}): {}\n",
        dashboard.active_tithers,
        dashboard.contributions,
        format_date(dashboard.month_total.start_date),
        format_date(dashboard.month_total.end_date),
        format_currency(dashboard.month_total.total)
    );
    if dashboard.birthdays_today.is_empty() {
        out.push_str("Nenhum aniversariante hoje.\n");
    } else {
        out.push_str(&format!(
            "Aniversariantes de hoje: {}\n{}",
            dashboard.birthdays_today.len(),
            birthday_table().render(&dashboard.birthdays_today)
        ));
    }
    out
}
