/// Master/detail schema. Every statement is idempotent.
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS grupos (
    id_grupo INTEGER PRIMARY KEY,
    nome_grupo TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS experimentos_master (
    id_experimento INTEGER PRIMARY KEY,
    id_grupo INTEGER NOT NULL,
    data_experimento TEXT,
    tipo_ensaio TEXT NOT NULL,
    id_detalhe_ensaio INTEGER NOT NULL,
    FOREIGN KEY (id_grupo) REFERENCES grupos (id_grupo)
        ON DELETE RESTRICT
        ON UPDATE CASCADE
);

CREATE TABLE IF NOT EXISTS detalhes_agonistas (
    id_agonista INTEGER PRIMARY KEY,
    id_animal INTEGER,
    condicao TEXT,
    arquivo_de_resultado TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS detalhes_cryptococcus (
    id_cryptococcus INTEGER PRIMARY KEY,
    id_animal INTEGER,
    condicao TEXT,
    arquivo_de_resultado TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS detalhes_fagocitose (
    id_fagocitose INTEGER PRIMARY KEY,
    id_animal INTEGER,
    condicao TEXT,
    arquivo_de_resultado TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS detalhes_imunofenotipagem (
    id_imunofenotipagem INTEGER PRIMARY KEY,
    id_animal INTEGER,
    condicao TEXT,
    arquivo_de_resultado TEXT NOT NULL
);
";
