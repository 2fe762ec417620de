use serde::Serialize;

/// Physical schema, injected verbatim into the system prompt so the agent
/// never needs to introspect the live database for vocabulary.
pub const SCHEMA_SQL: &str = r#"```sql
-- Tabela relacionando dados de clientes e seus contratos de locação de veículos
CREATE TABLE Chassis (
  Chassi INTEGER, -- ID do chassi
  Contrato INTEGER, -- ID do contrato
  Cliente INTEGER, -- ID do cliente
  Modelo INTEGER -- ID do modelo
);

-- Tabela contendo dados diários dos veículos obtidos por sensores
CREATE TABLE Telemetria (
  Chassi INTEGER, -- ID do chassi
  UnidadeMedida TEXT, -- Unidade de medida do valor descrito no campo Valor ('l' para litros ou 'hr' para horas)
  Categoria TEXT, -- Nome da categoria da informação sensoriada
  Data TIMESTAMP, -- Data e hora de captação do dado
  Serie TEXT, -- Nome da subcategoria do tipo de dado sensoriado pelo sensor
  Valor REAL -- Valor capturado pelo sensor, medido na UnidadeMedida, sobre a informação descrita pela Categoria e Serie
);
```"#;

/// Enumerated values of the Categoria and Serie columns, as prompt text.
pub const CATEGORY_NOTES: &str = r#"Além disso, temos a caracterização do conjunto de valores assumidos pelos campos de Categoria e Serie. As categorias são
expressas pelas strings nos tópicos principais e as séries, nas strings dos subtópicos (cada uma é descrita pelos comentários
entre colchetes e em itálico):

- Uso do Motor _[Tempo (em horas 'hr') em cada status de motor]_
  - Chave-Ligada _[Motor desligado]_
  - Marcha Lenta _[Motor ligado, mas improdutivo]_
  - Carga Baixa _[Motor ligado, mas com baixo uso]_
  - Carga Média _[Motor ligado com uso regular]_
  - Carga Alta _[Motor ligado com uso intenso]_
- Uso do Combustível do Motor _[Consumo de combustível (em litros 'l') em cada status de motor]_
  - Chave-Ligada _[Motor desligado]_
  - Marcha Lenta _[Motor ligado, mas improdutivo]_
  - Carga Baixa _[Motor ligado, mas com baixo uso]_
  - Carga Média _[Motor ligado com uso regular]_
  - Carga Alta _[Motor ligado com uso intenso]_
- Uso da Configuração do Modo do Motor _[Tempo (em horas 'hr') em cada configuração de motor]_
  - HP _[Modo de Alta Potência]_
  - P _[Modo Padrão]_
  - E _[Modo Econômico]_"#;

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub column_type: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub series: Vec<&'static str>,
}

const ENGINE_SERIES: [&str; 5] = [
    "Chave-Ligada",
    "Marcha Lenta",
    "Carga Baixa",
    "Carga Média",
    "Carga Alta",
];

/// Structured form of the two tables, served by the schema endpoint.
pub fn tables() -> Vec<TableInfo> {
    vec![
        TableInfo {
            name: "Chassis",
            description:
                "Tabela relacionando dados de clientes e seus contratos de locação de veículos",
            columns: vec![
                ColumnInfo { name: "Chassi", column_type: "INTEGER", description: "ID do chassi" },
                ColumnInfo { name: "Contrato", column_type: "INTEGER", description: "ID do contrato" },
                ColumnInfo { name: "Cliente", column_type: "INTEGER", description: "ID do cliente" },
                ColumnInfo { name: "Modelo", column_type: "INTEGER", description: "ID do modelo" },
            ],
        },
        TableInfo {
            name: "Telemetria",
            description: "Tabela contendo dados diários dos veículos obtidos por sensores",
            columns: vec![
                ColumnInfo { name: "Chassi", column_type: "INTEGER", description: "ID do chassi" },
                ColumnInfo {
                    name: "UnidadeMedida",
                    column_type: "TEXT",
                    description: "Unidade de medida ('l' para litros ou 'hr' para horas)",
                },
                ColumnInfo {
                    name: "Categoria",
                    column_type: "TEXT",
                    description: "Nome da categoria da informação sensoriada",
                },
                ColumnInfo {
                    name: "Data",
                    column_type: "TIMESTAMP",
                    description: "Data e hora de captação do dado",
                },
                ColumnInfo {
                    name: "Serie",
                    column_type: "TEXT",
                    description: "Nome da subcategoria do tipo de dado sensoriado",
                },
                ColumnInfo {
                    name: "Valor",
                    column_type: "REAL",
                    description: "Valor capturado pelo sensor",
                },
            ],
        },
    ]
}

/// Structured form of the Categoria/Serie vocabulary.
pub fn categories() -> Vec<CategoryInfo> {
    vec![
        CategoryInfo {
            name: "Uso do Motor",
            description: "Tempo (em horas 'hr') em cada status de motor",
            series: ENGINE_SERIES.to_vec(),
        },
        CategoryInfo {
            name: "Uso do Combustível do Motor",
            description: "Consumo de combustível (em litros 'l') em cada status de motor",
            series: ENGINE_SERIES.to_vec(),
        },
        CategoryInfo {
            name: "Uso da Configuração do Modo do Motor",
            description: "Tempo (em horas 'hr') em cada configuração de motor",
            series: vec!["HP", "P", "E"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_literal_matches_structured_tables() {
        // the prompt text and the endpoint payload describe the same schema
        for table in tables() {
            assert!(SCHEMA_SQL.contains(&format!("CREATE TABLE {} (", table.name)));
            for column in &table.columns {
                assert!(
                    SCHEMA_SQL.contains(&format!("{} {}", column.name, column.column_type)),
                    "column {} missing from schema literal",
                    column.name
                );
            }
        }
    }

    #[test]
    fn test_prompt_literal_matches_structured_categories() {
        for category in categories() {
            assert!(CATEGORY_NOTES.contains(category.name));
            for series in &category.series {
                assert!(CATEGORY_NOTES.contains(series));
            }
        }
    }
}
