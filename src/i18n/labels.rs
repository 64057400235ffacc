//! Short labels: buttons, menu rows and section titles.

pub(super) fn lookup(key: &str, lang: &str) -> Option<&'static str> {
    let s = match key {
        // --- Confirmation buttons ---
        "btn_confirm" => match lang {
            "Spanish" => "Confirmar",
            "Portuguese" => "Confirmar",
            "French" => "Confirmer",
            _ => "Confirm",
        },
        "btn_edit" => match lang {
            "Spanish" | "Portuguese" => "Editar",
            "French" => "Modifier",
            _ => "Edit",
        },
        "btn_send" => match lang {
            "Spanish" | "Portuguese" => "Enviar",
            "French" => "Envoyer",
            _ => "Send",
        },
        "btn_cancel" => match lang {
            "Spanish" | "Portuguese" => "Cancelar",
            "French" => "Annuler",
            _ => "Cancel",
        },

        // --- Menu ---
        "menu_body" => match lang {
            "Spanish" => "¿Qué quieres hacer?",
            "Portuguese" => "O que você quer fazer?",
            "French" => "Que voulez-vous faire ?",
            _ => "What would you like to do?",
        },
        "menu_button" => match lang {
            "Spanish" => "Ver opciones",
            "Portuguese" => "Ver opções",
            "French" => "Voir les options",
            _ => "See options",
        },
        "menu_billing" => match lang {
            "Spanish" => "Facturación",
            "Portuguese" => "Faturamento",
            "French" => "Facturation",
            _ => "Billing",
        },
        "menu_operations" => match lang {
            "Spanish" => "Operaciones",
            "Portuguese" => "Operações",
            "French" => "Opérations",
            _ => "Operations",
        },
        "row_create_invoice" => match lang {
            "Spanish" => "Crear factura",
            "Portuguese" => "Criar fatura",
            "French" => "Créer une facture",
            _ => "Create invoice",
        },
        "row_list_invoices" => match lang {
            "Spanish" => "Ver facturas",
            "Portuguese" => "Ver faturas",
            "French" => "Voir les factures",
            _ => "List invoices",
        },
        "row_list_clients" => match lang {
            "Spanish" => "Ver clientes",
            "Portuguese" => "Ver clientes",
            "French" => "Voir les clients",
            _ => "List clients",
        },
        "row_wallet_balance" => match lang {
            "Spanish" => "Saldo",
            "Portuguese" => "Saldo",
            "French" => "Solde",
            _ => "Wallet balance",
        },
        "row_list_routes" => match lang {
            "Spanish" => "Ver rutas",
            "Portuguese" => "Ver rotas",
            "French" => "Voir les trajets",
            _ => "List routes",
        },
        "row_list_drivers" => match lang {
            "Spanish" => "Ver conductores",
            "Portuguese" => "Ver motoristas",
            "French" => "Voir les chauffeurs",
            _ => "List drivers",
        },
        "row_list_vehicles" => match lang {
            "Spanish" => "Ver vehículos",
            "Portuguese" => "Ver veículos",
            "French" => "Voir les véhicules",
            _ => "List vehicles",
        },
        "row_payroll_summary" => match lang {
            "Spanish" => "Resumen de nómina",
            "Portuguese" => "Resumo da folha",
            "French" => "Résumé de paie",
            _ => "Payroll summary",
        },
        "row_revenue_report" => match lang {
            "Spanish" => "Reporte de ingresos",
            "Portuguese" => "Relatório de receita",
            "French" => "Rapport de revenus",
            _ => "Revenue report",
        },
        _ => return None,
    };
    Some(s)
}
